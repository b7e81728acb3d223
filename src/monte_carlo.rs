/// Monte Carlo stockout risk module
/// Replays an alert's stock under sampled daily demand many times to estimate
/// how likely it is to run out within the horizon

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::debug;

use crate::demand::{demand_distribution, sample_daily_demand};
use crate::error::{RedistributionError, Result};
use crate::models::StockoutAlert;

/// Trajectories stop after this many horizons
const MAX_HORIZONS: u32 = 4;

/// Distribution of days a stock lasts under uncertain demand
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StockoutRisk {
    pub simulations: usize,
    pub probability_within_horizon: f64,
    pub mean_days: f64,
    pub p10_days: u32,
    pub p50_days: u32, // Median
    pub p90_days: u32,
}

/// Run `simulations` trajectories for one alert.
/// A trajectory counts the full days of demand the current stock covers, as detection does.
pub fn estimate_stockout_risk(
    alert: &StockoutAlert,
    horizon_days: u32,
    simulations: usize,
    demand_cv: f64,
    seed: u64,
) -> Result<StockoutRisk> {
    if horizon_days == 0 {
        return Err(RedistributionError::InvalidHorizon(horizon_days));
    }
    if simulations == 0 {
        return Err(RedistributionError::InvalidConfig("at least one simulation is required".to_string()));
    }

    let distribution = demand_distribution(alert.daily_consumption as f64, demand_cv)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let max_days = horizon_days.saturating_mul(MAX_HORIZONS);

    let mut days: Vec<u32> = (0..simulations)
        .map(|_| {
            let mut remaining = alert.current_stock;
            let mut covered = 0;
            while covered < max_days {
                let demand = sample_daily_demand(&mut rng, &distribution);
                if demand > remaining {
                    break;
                }
                remaining -= demand;
                covered += 1;
            }
            covered
        })
        .collect();

    days.sort_unstable();

    let within_horizon = days.iter().filter(|&&d| d <= horizon_days).count();
    let mean_days = days.iter().map(|&d| d as f64).sum::<f64>() / days.len() as f64;

    let percentile = |p: f64| {
        let index = ((p / 100.0) * (days.len() as f64 - 1.0)).round() as usize;
        days[index.min(days.len() - 1)]
    };

    let risk = StockoutRisk {
        simulations,
        probability_within_horizon: within_horizon as f64 / simulations as f64,
        mean_days,
        p10_days: percentile(10.0),
        p50_days: percentile(50.0),
        p90_days: percentile(90.0),
    };

    debug!(
        facility = %alert.facility_id,
        drug = %alert.drug_id,
        probability = risk.probability_within_horizon,
        "Stockout risk estimated"
    );
    Ok(risk)
}
