/// Stockout detection module
/// Scans hospitals and pharmacies for drugs that will run out within the horizon
/// or already sit close to their reorder point

use tracing::{debug, warn};

use crate::error::{RedistributionError, Result};
use crate::models::{Facility, FacilityKind, StockoutAlert, Urgency};
use crate::registry::FacilityRegistry;

pub const DEFAULT_HORIZON_DAYS: u32 = 7;

/// Stock at or below this multiple of the minimum is flagged regardless of days left
pub const SAFETY_MARGIN_FACTOR: f64 = 1.2;

/// Days of consumption a restock must cover at minimum
const RESTOCK_COVER_DAYS: u32 = 7;

/// Detect projected stockouts at every consumption point.
/// Alerts are ordered most urgent first; equal days keep registry order.
pub fn detect_stockouts(registry: &FacilityRegistry, horizon_days: u32) -> Result<Vec<StockoutAlert>> {
    if horizon_days == 0 {
        return Err(RedistributionError::InvalidHorizon(horizon_days));
    }

    let mut alerts: Vec<StockoutAlert> = registry
        .of_kind(FacilityKind::Hospital)
        .chain(registry.of_kind(FacilityKind::Pharmacy))
        .flat_map(|facility| facility_alerts(facility, horizon_days))
        .collect();

    alerts.sort_by_key(|alert| alert.days_until_stockout);

    debug!(horizon_days, alerts = alerts.len(), "Stockout detection complete");
    Ok(alerts)
}

fn facility_alerts(facility: &Facility, horizon_days: u32) -> Vec<StockoutAlert> {
    let mut alerts = Vec::new();

    for (drug_id, &current_stock) in &facility.stock_levels {
        let daily_consumption = facility.daily_consumption_of(drug_id);
        if daily_consumption == 0 {
            // never runs out at zero consumption
            warn!(facility = %facility.id, drug = %drug_id, "Zero daily consumption, skipping");
            continue;
        }

        let minimum_stock = facility.minimum_stock_of(drug_id);
        let days_until_stockout = current_stock / daily_consumption;
        let below_safety_margin = current_stock as f64 <= minimum_stock as f64 * SAFETY_MARGIN_FACTOR;

        if days_until_stockout <= horizon_days || below_safety_margin {
            alerts.push(StockoutAlert {
                facility_id: facility.id.clone(),
                facility_name: facility.name.clone(),
                facility_kind: facility.kind(),
                drug_id: drug_id.clone(),
                current_stock,
                daily_consumption,
                minimum_stock,
                days_until_stockout,
                urgency: Urgency::from_days(days_until_stockout),
                required_quantity: required_quantity(current_stock, daily_consumption, minimum_stock),
                coordinates: facility.coordinates,
            });
        }
    }

    alerts
}

/// Restock target: enough to restore twice the minimum, or a week of consumption, whichever is larger
pub fn required_quantity(current_stock: u32, daily_consumption: u32, minimum_stock: u32) -> u32 {
    let buffer_gap = (minimum_stock as u64 * 2).saturating_sub(current_stock as u64);
    let week_cover = daily_consumption as u64 * RESTOCK_COVER_DAYS as u64;
    buffer_gap.max(week_cover).min(u32::MAX as u64) as u32
}

/// Alert counts per urgency
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlertSummary {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
}

pub fn summarize_alerts(alerts: &[StockoutAlert]) -> AlertSummary {
    alerts.iter().fold(AlertSummary::default(), |mut summary, alert| {
        summary.total += 1;
        match alert.urgency {
            Urgency::Critical => summary.critical += 1,
            Urgency::High => summary.high += 1,
            Urgency::Medium => summary.medium += 1,
        }
        summary
    })
}

/// The `n` most urgent alerts from an already sorted list
pub fn top_alerts(alerts: &[StockoutAlert], n: usize) -> &[StockoutAlert] {
    &alerts[..n.min(alerts.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConsumptionProfile, Coordinates, DrugUnits, FacilityProfile};

    fn hospital(id: &str, drugs: &[(&str, u32, u32, u32)]) -> Facility {
        // (drug, stock, daily, minimum)
        let mut stock = DrugUnits::new();
        let mut profile = ConsumptionProfile { capacity: 1_000, ..Default::default() };
        for &(drug, s, d, m) in drugs {
            stock.insert(drug.to_string(), s);
            profile.daily_consumption.insert(drug.to_string(), d);
            profile.minimum_stock.insert(drug.to_string(), m);
        }
        Facility {
            id: id.to_string(),
            name: format!("Hospital {}", id),
            address: String::new(),
            contact: String::new(),
            coordinates: Coordinates::new(37.7, -122.4),
            stock_levels: stock,
            profile: FacilityProfile::Hospital(profile),
        }
    }

    fn registry(facilities: Vec<Facility>) -> FacilityRegistry {
        FacilityRegistry::new(facilities).unwrap()
    }

    #[test]
    fn test_critical_alert_values() {
        let reg = registry(vec![hospital("H1", &[("drug-a", 40, 15, 60)])]);
        let alerts = detect_stockouts(&reg, 7).unwrap();

        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.days_until_stockout, 2);
        assert_eq!(alert.urgency, Urgency::Critical);
        assert_eq!(alert.required_quantity, 105);
        assert_eq!(alert.facility_kind, FacilityKind::Hospital);
    }

    #[test]
    fn test_safety_margin_alone_triggers_alert() {
        // 100 days of stock but below 1.2x minimum
        let reg = registry(vec![hospital("H1", &[("drug-a", 1_000, 10, 900)])]);
        let alerts = detect_stockouts(&reg, 7).unwrap();

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].days_until_stockout, 100);
        assert_eq!(alerts[0].urgency, Urgency::Medium);
        assert_eq!(alerts[0].required_quantity, 800);
    }

    #[test]
    fn test_comfortable_stock_produces_no_alert() {
        let reg = registry(vec![hospital("H1", &[("drug-a", 1_000, 10, 100)])]);
        assert!(detect_stockouts(&reg, 7).unwrap().is_empty());
    }

    #[test]
    fn test_horizon_boundary_is_inclusive() {
        let reg = registry(vec![hospital("H1", &[("drug-a", 79, 10, 0)])]);
        assert_eq!(detect_stockouts(&reg, 7).unwrap().len(), 1);

        let reg = registry(vec![hospital("H1", &[("drug-a", 80, 10, 0)])]);
        assert!(detect_stockouts(&reg, 7).unwrap().is_empty());
    }

    #[test]
    fn test_zero_consumption_never_stocks_out() {
        let reg = registry(vec![hospital("H1", &[("drug-a", 0, 0, 50)])]);
        assert!(detect_stockouts(&reg, 7).unwrap().is_empty());
    }

    #[test]
    fn test_zero_horizon_is_rejected() {
        let reg = registry(vec![]);
        assert!(matches!(detect_stockouts(&reg, 0), Err(RedistributionError::InvalidHorizon(0))));
    }

    #[test]
    fn test_supply_facilities_are_ignored() {
        let reg = FacilityRegistry::builtin();
        let alerts = detect_stockouts(&reg, 7).unwrap();
        assert!(alerts.iter().all(|a| a.facility_kind.is_consumption_point()));
    }

    #[test]
    fn test_alerts_sorted_by_days() {
        let alerts = detect_stockouts(&FacilityRegistry::builtin(), 7).unwrap();
        assert!(!alerts.is_empty());
        assert!(alerts.windows(2).all(|w| w[0].days_until_stockout <= w[1].days_until_stockout));
    }

    #[test]
    fn test_every_alert_uses_floor_division() {
        let alerts = detect_stockouts(&FacilityRegistry::builtin(), 7).unwrap();
        for alert in &alerts {
            assert_eq!(alert.days_until_stockout, alert.current_stock / alert.daily_consumption);
            assert_eq!(alert.urgency, Urgency::from_days(alert.days_until_stockout));
        }
    }

    #[test]
    fn test_required_quantity_picks_larger_target() {
        assert_eq!(required_quantity(40, 15, 60), 105);
        assert_eq!(required_quantity(10, 5, 100), 190);
        assert_eq!(required_quantity(500, 5, 100), 35);
    }

    #[test]
    fn test_summary_and_top_alerts() {
        let reg = registry(vec![hospital(
            "H1",
            &[("a", 10, 10, 0), ("b", 40, 10, 0), ("c", 70, 10, 0), ("d", 20, 10, 0)],
        )]);
        let alerts = detect_stockouts(&reg, 7).unwrap();
        let summary = summarize_alerts(&alerts);

        assert_eq!(summary, AlertSummary { total: 4, critical: 2, high: 1, medium: 1 });
        assert_eq!(top_alerts(&alerts, 2).len(), 2);
        assert_eq!(top_alerts(&alerts, 10).len(), 4);
        assert_eq!(top_alerts(&alerts, 1)[0].drug_id, "a");
    }
}
