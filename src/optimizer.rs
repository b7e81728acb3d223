/// Source ranking module
/// Finds facilities able to resolve a stockout and orders them by a composite score
/// of distance, available stock, supply-chain tier and how much of the order they can cover

use tracing::debug;

use crate::geo::{estimate_eta_hours, haversine_miles, round_to, TransportMode};
use crate::models::{Facility, FacilityKind, PriorityTier, SourceCandidate, StockoutAlert};
use crate::registry::FacilityRegistry;

/// Minimum share of the required quantity a source must hold to be considered
const DISTRIBUTOR_MIN_SHARE: f64 = 0.3;
const MANUFACTURER_MIN_SHARE: f64 = 0.5;
const PEER_MIN_SHARE: f64 = 0.2;

/// Peers keep this multiple of their minimum stock for themselves
const PEER_RESERVE_FACTOR: f64 = 1.5;

const HANDLING_COST_PER_UNIT: f64 = 0.05;
const DISPATCH_FEE: f64 = 50.0;

/// Rank every facility that could supply the alert's drug, best first.
/// Distributors are considered before manufacturers, then peer consumption points.
pub fn find_optimal_sources(alert: &StockoutAlert, registry: &FacilityRegistry) -> Vec<SourceCandidate> {
    let required = alert.required_quantity;
    let mut sources = Vec::new();

    for distributor in registry.of_kind(FacilityKind::Distributor) {
        let available = distributor.stock_of(&alert.drug_id) as f64;
        if meets_share(available, required, DISTRIBUTOR_MIN_SHARE) {
            sources.push(build_candidate(alert, distributor, available, PriorityTier::Distributor, TransportMode::Truck));
        }
    }

    for manufacturer in registry.of_kind(FacilityKind::Manufacturer) {
        let available = manufacturer.stock_of(&alert.drug_id) as f64;
        if meets_share(available, required, MANUFACTURER_MIN_SHARE) {
            sources.push(build_candidate(alert, manufacturer, available, PriorityTier::Manufacturer, TransportMode::Truck));
        }
    }

    let peers = registry
        .of_kind(FacilityKind::Pharmacy)
        .chain(registry.of_kind(FacilityKind::Hospital))
        .filter(|peer| peer.id != alert.facility_id);
    for peer in peers {
        let surplus = peer_surplus(peer, &alert.drug_id);
        if meets_share(surplus, required, PEER_MIN_SHARE) {
            sources.push(build_candidate(alert, peer, surplus, PriorityTier::PeerTransfer, TransportMode::Local));
        }
    }

    // stable: equal scores keep tier order
    sources.sort_by(|a, b| b.score.total_cmp(&a.score));

    debug!(
        facility = %alert.facility_id,
        drug = %alert.drug_id,
        candidates = sources.len(),
        "Source ranking complete"
    );
    sources
}

fn meets_share(available: f64, required: u32, share: f64) -> bool {
    available >= required as f64 * share
}

/// Stock a peer can give away without dropping below its reserve; may be fractional
pub fn peer_surplus(peer: &Facility, drug_id: &str) -> f64 {
    let reserve = peer.minimum_stock_of(drug_id) as f64 * PEER_RESERVE_FACTOR;
    (peer.stock_of(drug_id) as f64 - reserve).max(0.0)
}

fn build_candidate(
    alert: &StockoutAlert,
    source: &Facility,
    available: f64,
    priority_tier: PriorityTier,
    transport_mode: TransportMode,
) -> SourceCandidate {
    let distance = haversine_miles(alert.coordinates, source.coordinates);
    let eta = estimate_eta_hours(distance, transport_mode);
    // whole units only for the shipped quantity; ranking uses the exact amount
    let available_stock = available.floor() as u32;
    let can_fulfill = available_stock.min(alert.required_quantity);

    SourceCandidate {
        facility_id: source.id.clone(),
        facility_name: source.name.clone(),
        facility_kind: source.kind(),
        address: source.address.clone(),
        contact: source.contact.clone(),
        coordinates: source.coordinates,
        available_stock,
        distance_miles: round_to(distance, 1),
        eta_hours: round_to(eta, 1),
        priority_tier,
        transport_mode,
        can_fulfill,
        cost_usd: calculate_cost(distance, can_fulfill, transport_mode),
        score: calculate_score(distance, available, alert.required_quantity, priority_tier),
    }
}

/// Delivery cost in USD, rounded to cents: mileage, per-unit handling and a flat dispatch fee
pub fn calculate_cost(distance_miles: f64, quantity: u32, mode: TransportMode) -> f64 {
    let distance_cost = distance_miles * mode.rate_per_mile();
    let quantity_cost = quantity as f64 * HANDLING_COST_PER_UNIT;
    round_to(distance_cost + quantity_cost + DISPATCH_FEE, 2)
}

/// Composite score, higher is better.
///
/// 30% proximity (100 at the door, 0 beyond 50 miles), 20% stock depth (capped at twice
/// the requirement), 30% tier weight and 20% share of the order covered.
/// A zero requirement counts as fully covered.
pub fn calculate_score(distance_miles: f64, available_stock: f64, required_quantity: u32, tier: PriorityTier) -> f64 {
    let distance_score = (100.0 - distance_miles * 2.0).max(0.0);

    let (stock_score, fulfillment_score) = if required_quantity == 0 {
        (100.0, 100.0)
    } else {
        let required = required_quantity as f64;
        let stock_score = (available_stock / required * 50.0).min(100.0);
        let fulfillment_score = available_stock.min(required) / required * 100.0;
        (stock_score, fulfillment_score)
    };

    distance_score * 0.3 + stock_score * 0.2 + tier.weight() * 0.3 + fulfillment_score * 0.2
}
