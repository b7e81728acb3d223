/// Facility registry module
/// An immutable snapshot of every facility, shared by detection and source ranking.
/// Refreshing stock produces a new snapshot; an existing one is never mutated.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{RedistributionError, Result};
use crate::models::{ConsumptionProfile, Coordinates, DrugId, DrugUnits, Facility, FacilityKind, FacilityProfile};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FacilityRegistry {
    facilities: Vec<Facility>,
}

impl FacilityRegistry {
    /// Build a registry, rejecting duplicate ids and bad coordinates.
    /// Drugs a consumption point tracks but holds no stock entry for are added with 0 units.
    pub fn new(mut facilities: Vec<Facility>) -> Result<Self> {
        let mut seen = HashSet::new();
        for facility in &mut facilities {
            validate_facility(facility)?;
            if !seen.insert(facility.id.clone()) {
                return Err(RedistributionError::DuplicateFacility(facility.id.clone()));
            }
            fill_missing_stock_entries(facility);
        }
        Ok(FacilityRegistry { facilities })
    }

    /// Parse a JSON array of facilities
    pub fn from_json_str(json: &str) -> Result<Self> {
        let facilities: Vec<Facility> = serde_json::from_str(json)?;
        Self::new(facilities)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let registry = Self::from_json_str(&raw)?;
        info!(path = %path.display(), facilities = registry.len(), "Loaded facility registry");
        Ok(registry)
    }

    /// The demo catalog: two manufacturers, two distributors, three hospitals and
    /// two pharmacies around the San Francisco Bay Area
    pub fn builtin() -> Self {
        FacilityRegistry { facilities: builtin_facilities() }
    }

    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    pub fn get(&self, facility_id: &str) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.id == facility_id)
    }

    pub fn require(&self, facility_id: &str) -> Result<&Facility> {
        self.get(facility_id)
            .ok_or_else(|| RedistributionError::UnknownFacility(facility_id.to_string()))
    }

    /// Facilities of one kind, in registry order
    pub fn of_kind(&self, kind: FacilityKind) -> impl Iterator<Item = &Facility> + '_ {
        self.facilities.iter().filter(move |f| f.kind() == kind)
    }

    pub fn count_of(&self, kind: FacilityKind) -> usize {
        self.of_kind(kind).count()
    }

    /// New snapshot with one stock level replaced
    pub fn with_stock_update(&self, facility_id: &str, drug_id: &str, units: u32) -> Result<Self> {
        self.require(facility_id)?;
        let mut facilities = self.facilities.clone();
        if let Some(facility) = facilities.iter_mut().find(|f| f.id == facility_id) {
            facility.stock_levels.insert(drug_id.to_string(), units);
        }
        Ok(FacilityRegistry { facilities })
    }
}

fn validate_facility(facility: &Facility) -> Result<()> {
    let invalid = |reason: &str| RedistributionError::InvalidFacilityData {
        facility_id: facility.id.clone(),
        reason: reason.to_string(),
    };

    if facility.id.trim().is_empty() {
        return Err(invalid("empty facility id"));
    }
    let Coordinates { lat, lng } = facility.coordinates;
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(invalid("latitude out of range"));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(invalid("longitude out of range"));
    }
    if let FacilityProfile::Distributor { delivery_radius_miles, .. } = facility.profile {
        if !delivery_radius_miles.is_finite() || delivery_radius_miles < 0.0 {
            return Err(invalid("delivery radius must be a non-negative number"));
        }
    }
    Ok(())
}

fn fill_missing_stock_entries(facility: &mut Facility) {
    let missing: BTreeSet<DrugId> = match facility.consumption_profile() {
        Some(profile) => profile
            .daily_consumption
            .keys()
            .chain(profile.minimum_stock.keys())
            .filter(|drug_id| !facility.stock_levels.contains_key(*drug_id))
            .cloned()
            .collect(),
        None => return,
    };

    for drug_id in missing {
        warn!(facility = %facility.id, drug = %drug_id, "No stock entry for tracked drug, assuming 0 units");
        facility.stock_levels.insert(drug_id, 0);
    }
}

fn units(entries: &[(&str, u32)]) -> DrugUnits {
    entries.iter().map(|&(drug, qty)| (drug.to_string(), qty)).collect()
}

fn facility(
    id: &str,
    name: &str,
    address: &str,
    contact: &str,
    (lat, lng): (f64, f64),
    stock_levels: DrugUnits,
    profile: FacilityProfile,
) -> Facility {
    Facility {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        contact: contact.to_string(),
        coordinates: Coordinates::new(lat, lng),
        stock_levels,
        profile,
    }
}

fn consumption(capacity: u32, daily: &[(&str, u32)], minimum: &[(&str, u32)]) -> ConsumptionProfile {
    ConsumptionProfile {
        capacity,
        daily_consumption: units(daily),
        minimum_stock: units(minimum),
    }
}

const PARACETAMOL: &str = "paracetamol-500mg";
const AMOXICILLIN: &str = "amoxicillin-250mg";
const ASPIRIN: &str = "aspirin-100mg";
const IBUPROFEN: &str = "ibuprofen-400mg";

fn builtin_facilities() -> Vec<Facility> {
    vec![
        // Manufacturers
        facility(
            "MFG001", "PharmaCorp Manufacturing", "123 Industrial Blvd, San Francisco, CA", "+1-555-0101",
            (37.7749, -122.4194),
            units(&[(PARACETAMOL, 50_000), (AMOXICILLIN, 30_000), (ASPIRIN, 75_000), (IBUPROFEN, 40_000)]),
            FacilityProfile::Manufacturer { capacity: 100_000, weekly_production: 25_000 },
        ),
        facility(
            "MFG002", "MediPharma Industries", "456 Pharma Way, Los Angeles, CA", "+1-555-0102",
            (34.0522, -118.2437),
            units(&[(PARACETAMOL, 35_000), (AMOXICILLIN, 45_000), (ASPIRIN, 60_000), (IBUPROFEN, 55_000)]),
            FacilityProfile::Manufacturer { capacity: 120_000, weekly_production: 30_000 },
        ),
        // Distributors
        facility(
            "DIST001", "Global Distribution Network", "789 Logistics Ave, Oakland, CA", "+1-555-0201",
            (37.8044, -122.2711),
            units(&[(PARACETAMOL, 8_000), (AMOXICILLIN, 5_000), (ASPIRIN, 12_000), (IBUPROFEN, 7_500)]),
            FacilityProfile::Distributor { capacity: 50_000, delivery_radius_miles: 100.0 },
        ),
        facility(
            "DIST002", "Regional Pharma Logistics", "321 Supply Chain Dr, San Jose, CA", "+1-555-0202",
            (37.3382, -121.8863),
            units(&[(PARACETAMOL, 6_500), (AMOXICILLIN, 8_000), (ASPIRIN, 9_000), (IBUPROFEN, 5_500)]),
            FacilityProfile::Distributor { capacity: 40_000, delivery_radius_miles: 80.0 },
        ),
        // Hospitals
        facility(
            "HOSP001", "City General Hospital", "555 Medical Center Dr, San Francisco, CA", "+1-555-0301",
            (37.7849, -122.4094),
            units(&[(PARACETAMOL, 150), (AMOXICILLIN, 80), (ASPIRIN, 200), (IBUPROFEN, 120)]),
            FacilityProfile::Hospital(consumption(
                2_000,
                &[(PARACETAMOL, 25), (AMOXICILLIN, 15), (ASPIRIN, 30), (IBUPROFEN, 20)],
                &[(PARACETAMOL, 100), (AMOXICILLIN, 50), (ASPIRIN, 150), (IBUPROFEN, 80)],
            )),
        ),
        facility(
            "HOSP002", "Metropolitan Medical Center", "777 Healthcare Way, Berkeley, CA", "+1-555-0302",
            (37.8715, -122.2730),
            units(&[(PARACETAMOL, 75), (AMOXICILLIN, 45), (ASPIRIN, 110), (IBUPROFEN, 65)]),
            FacilityProfile::Hospital(consumption(
                1_500,
                &[(PARACETAMOL, 20), (AMOXICILLIN, 12), (ASPIRIN, 25), (IBUPROFEN, 15)],
                &[(PARACETAMOL, 80), (AMOXICILLIN, 40), (ASPIRIN, 120), (IBUPROFEN, 60)],
            )),
        ),
        facility(
            "HOSP003", "Valley Emergency Care", "999 Emergency Blvd, Palo Alto, CA", "+1-555-0303",
            (37.4419, -122.1430),
            units(&[(PARACETAMOL, 40), (AMOXICILLIN, 25), (ASPIRIN, 60), (IBUPROFEN, 35)]),
            FacilityProfile::Hospital(consumption(
                800,
                &[(PARACETAMOL, 15), (AMOXICILLIN, 8), (ASPIRIN, 18), (IBUPROFEN, 12)],
                &[(PARACETAMOL, 60), (AMOXICILLIN, 30), (ASPIRIN, 90), (IBUPROFEN, 45)],
            )),
        ),
        // Pharmacies
        facility(
            "PHARM001", "Central Pharmacy", "123 Main St, San Francisco, CA", "+1-555-0401",
            (37.7849, -122.4194),
            units(&[(PARACETAMOL, 300), (AMOXICILLIN, 180), (ASPIRIN, 450), (IBUPROFEN, 220)]),
            FacilityProfile::Pharmacy(consumption(
                5_000,
                &[(PARACETAMOL, 35), (AMOXICILLIN, 20), (ASPIRIN, 40), (IBUPROFEN, 25)],
                &[(PARACETAMOL, 200), (AMOXICILLIN, 100), (ASPIRIN, 300), (IBUPROFEN, 150)],
            )),
        ),
        facility(
            "PHARM002", "Bay Area Pharmacy", "456 Bay St, Oakland, CA", "+1-555-0402",
            (37.8044, -122.2711),
            units(&[(PARACETAMOL, 180), (AMOXICILLIN, 120), (ASPIRIN, 280), (IBUPROFEN, 160)]),
            FacilityProfile::Pharmacy(consumption(
                4_000,
                &[(PARACETAMOL, 30), (AMOXICILLIN, 18), (ASPIRIN, 35), (IBUPROFEN, 22)],
                &[(PARACETAMOL, 150), (AMOXICILLIN, 80), (ASPIRIN, 250), (IBUPROFEN, 120)],
            )),
        ),
    ]
}
