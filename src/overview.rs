/// Network-wide statistics for the registry and the current alerts

use std::collections::BTreeSet;

use serde::Serialize;

use crate::detection::summarize_alerts;
use crate::models::{DrugId, FacilityKind, StockoutAlert, Urgency};
use crate::registry::FacilityRegistry;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FacilityStockTotal {
    pub facility_id: String,
    pub facility_name: String,
    pub kind: FacilityKind,
    pub total_stock: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NetworkOverview {
    pub total_facilities: usize,
    pub manufacturers: usize,
    pub distributors: usize,
    pub hospitals: usize,
    pub pharmacies: usize,
    pub active_stockouts: usize,
    pub critical_alerts: usize,
    pub high_alerts: usize,
    pub critical_facilities: Vec<String>, // ids with at least one critical alert
    pub critical_drugs: Vec<DrugId>,
    /// Mean of stock held / capacity over facilities with a capacity, in percent
    pub average_stock_level_pct: f64,
    pub facility_stock_totals: Vec<FacilityStockTotal>,
}

pub fn network_overview(registry: &FacilityRegistry, alerts: &[StockoutAlert]) -> NetworkOverview {
    let summary = summarize_alerts(alerts);

    let critical: Vec<&StockoutAlert> = alerts.iter().filter(|a| a.urgency == Urgency::Critical).collect();
    let critical_facilities: BTreeSet<String> = critical.iter().map(|a| a.facility_id.clone()).collect();
    let critical_drugs: BTreeSet<DrugId> = critical.iter().map(|a| a.drug_id.clone()).collect();

    let utilisation: Vec<f64> = registry
        .facilities()
        .iter()
        .filter(|f| f.capacity() > 0)
        .map(|f| f.total_stock() as f64 / f.capacity() as f64 * 100.0)
        .collect();
    let average_stock_level_pct = if utilisation.is_empty() {
        0.0
    } else {
        utilisation.iter().sum::<f64>() / utilisation.len() as f64
    };

    let facility_stock_totals = registry
        .facilities()
        .iter()
        .map(|f| FacilityStockTotal {
            facility_id: f.id.clone(),
            facility_name: f.name.clone(),
            kind: f.kind(),
            total_stock: f.total_stock(),
        })
        .collect();

    NetworkOverview {
        total_facilities: registry.len(),
        manufacturers: registry.count_of(FacilityKind::Manufacturer),
        distributors: registry.count_of(FacilityKind::Distributor),
        hospitals: registry.count_of(FacilityKind::Hospital),
        pharmacies: registry.count_of(FacilityKind::Pharmacy),
        active_stockouts: summary.total,
        critical_alerts: summary.critical,
        high_alerts: summary.high,
        critical_facilities: critical_facilities.into_iter().collect(),
        critical_drugs: critical_drugs.into_iter().collect(),
        average_stock_level_pct,
        facility_stock_totals,
    }
}
