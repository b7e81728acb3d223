use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::TransportMode;

/// Drug identifier, e.g. `"paracetamol-500mg"`
pub type DrugId = String;

/// Units per drug. Ordered so that every pass over a facility visits drugs in the same order.
pub type DrugUnits = BTreeMap<DrugId, u32>;

/// Geographic position in decimal degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Coordinates { lat, lng }
    }
}

/// Role of a facility in the supply chain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityKind {
    Manufacturer,
    Distributor,
    Hospital,
    Pharmacy,
}

impl FacilityKind {
    /// Hospitals and pharmacies consume stock; the rest only supply it
    pub fn is_consumption_point(self) -> bool {
        matches!(self, FacilityKind::Hospital | FacilityKind::Pharmacy)
    }

    pub fn label(self) -> &'static str {
        match self {
            FacilityKind::Manufacturer => "manufacturer",
            FacilityKind::Distributor => "distributor",
            FacilityKind::Hospital => "hospital",
            FacilityKind::Pharmacy => "pharmacy",
        }
    }
}

impl fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Consumption data carried by hospitals and pharmacies
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionProfile {
    pub capacity: u32,
    #[serde(default)]
    pub daily_consumption: DrugUnits, // units/day
    #[serde(default)]
    pub minimum_stock: DrugUnits,     // reorder point
}

/// Kind-specific facility data, tagged by `kind` in serialized form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FacilityProfile {
    Manufacturer {
        capacity: u32,
        #[serde(default)]
        weekly_production: u32,
    },
    Distributor {
        capacity: u32,
        #[serde(default)]
        delivery_radius_miles: f64,
    },
    Hospital(ConsumptionProfile),
    Pharmacy(ConsumptionProfile),
}

impl FacilityProfile {
    pub fn kind(&self) -> FacilityKind {
        match self {
            FacilityProfile::Manufacturer { .. } => FacilityKind::Manufacturer,
            FacilityProfile::Distributor { .. } => FacilityKind::Distributor,
            FacilityProfile::Hospital(_) => FacilityKind::Hospital,
            FacilityProfile::Pharmacy(_) => FacilityKind::Pharmacy,
        }
    }
}

/// A facility in the registry. Read-only once the registry is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact: String,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub stock_levels: DrugUnits,
    #[serde(flatten)]
    pub profile: FacilityProfile,
}

impl Facility {
    pub fn kind(&self) -> FacilityKind {
        self.profile.kind()
    }

    /// Units on hand for a drug; absent entries count as zero
    pub fn stock_of(&self, drug_id: &str) -> u32 {
        self.stock_levels.get(drug_id).copied().unwrap_or(0)
    }

    pub fn consumption_profile(&self) -> Option<&ConsumptionProfile> {
        match &self.profile {
            FacilityProfile::Hospital(p) | FacilityProfile::Pharmacy(p) => Some(p),
            _ => None,
        }
    }

    pub fn daily_consumption_of(&self, drug_id: &str) -> u32 {
        self.consumption_profile()
            .and_then(|p| p.daily_consumption.get(drug_id).copied())
            .unwrap_or(0)
    }

    pub fn minimum_stock_of(&self, drug_id: &str) -> u32 {
        self.consumption_profile()
            .and_then(|p| p.minimum_stock.get(drug_id).copied())
            .unwrap_or(0)
    }

    pub fn capacity(&self) -> u32 {
        match &self.profile {
            FacilityProfile::Manufacturer { capacity, .. } => *capacity,
            FacilityProfile::Distributor { capacity, .. } => *capacity,
            FacilityProfile::Hospital(p) | FacilityProfile::Pharmacy(p) => p.capacity,
        }
    }

    /// Sum of all stock held, across drugs
    pub fn total_stock(&self) -> u64 {
        self.stock_levels.values().map(|&u| u as u64).sum()
    }
}

/// How soon a stockout will happen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    High,
    Medium,
}

impl Urgency {
    /// <= 2 days is critical, <= 5 days is high, anything else medium
    pub fn from_days(days_until_stockout: u32) -> Self {
        if days_until_stockout <= 2 {
            Urgency::Critical
        } else if days_until_stockout <= 5 {
            Urgency::High
        } else {
            Urgency::Medium
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Urgency::Critical => "critical",
            Urgency::High => "high",
            Urgency::Medium => "medium",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// A projected stockout of one drug at one consumption point
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockoutAlert {
    pub facility_id: String,
    pub facility_name: String,
    pub facility_kind: FacilityKind,
    pub drug_id: DrugId,
    pub current_stock: u32,
    pub daily_consumption: u32,
    pub minimum_stock: u32,
    pub days_until_stockout: u32,
    pub urgency: Urgency,
    pub required_quantity: u32,
    pub coordinates: Coordinates,
}

/// Supply-chain rank of a source; lower ranks are preferred. Serialized as the rank number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PriorityTier {
    Distributor,
    Manufacturer,
    PeerTransfer,
}

impl PriorityTier {
    pub fn rank(self) -> u8 {
        match self {
            PriorityTier::Distributor => 1,
            PriorityTier::Manufacturer => 2,
            PriorityTier::PeerTransfer => 3,
        }
    }

    /// Weight of the tier in the composite score
    pub fn weight(self) -> f64 {
        match self {
            PriorityTier::Distributor => 100.0,
            PriorityTier::Manufacturer => 80.0,
            PriorityTier::PeerTransfer => 60.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriorityTier::Distributor => "Distributor",
            PriorityTier::Manufacturer => "Manufacturer",
            PriorityTier::PeerTransfer => "Peer Transfer",
        }
    }
}

impl From<PriorityTier> for u8 {
    fn from(tier: PriorityTier) -> Self {
        tier.rank()
    }
}

impl TryFrom<u8> for PriorityTier {
    type Error = String;

    fn try_from(rank: u8) -> std::result::Result<Self, Self::Error> {
        match rank {
            1 => Ok(PriorityTier::Distributor),
            2 => Ok(PriorityTier::Manufacturer),
            3 => Ok(PriorityTier::PeerTransfer),
            other => Err(format!("unknown priority tier {other}")),
        }
    }
}

/// A facility that could resolve a stockout, with its ranking data
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceCandidate {
    pub facility_id: String,
    pub facility_name: String,
    pub facility_kind: FacilityKind,
    pub address: String,
    pub contact: String,
    pub coordinates: Coordinates,
    pub available_stock: u32,      // surplus only, for peer transfers
    pub distance_miles: f64,       // 1 decimal
    pub eta_hours: f64,            // 1 decimal
    pub priority_tier: PriorityTier,
    pub transport_mode: TransportMode,
    pub can_fulfill: u32,
    pub cost_usd: f64,             // 2 decimals
    pub score: f64,
}
