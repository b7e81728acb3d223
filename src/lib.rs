//! Stockout detection and supply-source ranking for a pharmaceutical distribution network.
//!
//! A [`FacilityRegistry`] snapshot feeds [`detect_stockouts`], and each resulting alert is
//! handed to [`find_optimal_sources`] to rank distributors, manufacturers and peer facilities.

pub mod config;
pub mod demand;
pub mod detection;
pub mod error;
pub mod geo;
pub mod models;
pub mod monte_carlo;
pub mod optimizer;
pub mod overview;
pub mod pairing;
pub mod registry;
pub mod reporting;

pub use config::RedistributionConfig;
pub use detection::{detect_stockouts, summarize_alerts, top_alerts, AlertSummary, DEFAULT_HORIZON_DAYS};
pub use error::{RedistributionError, Result};
pub use geo::{estimate_eta_hours, haversine_miles, TransportMode};
pub use models::{
    ConsumptionProfile, Coordinates, DrugId, Facility, FacilityKind, FacilityProfile, PriorityTier,
    SourceCandidate, StockoutAlert, Urgency,
};
pub use monte_carlo::{estimate_stockout_risk, StockoutRisk};
pub use optimizer::{calculate_cost, calculate_score, find_optimal_sources};
pub use overview::{network_overview, NetworkOverview};
pub use pairing::{plan_alerts, plan_redistribution, RedistributionPlan};
pub use registry::FacilityRegistry;
