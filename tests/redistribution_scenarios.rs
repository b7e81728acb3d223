use approx::assert_abs_diff_eq;

use pharma_redistribution::{
    calculate_cost, detect_stockouts, estimate_eta_hours, find_optimal_sources, haversine_miles,
    plan_redistribution, ConsumptionProfile, Coordinates, Facility, FacilityProfile, FacilityRegistry,
    PriorityTier, RedistributionConfig, TransportMode, Urgency,
};

const DRUG: &str = "amoxicillin-250mg";

fn consumption_point(id: &str, coordinates: Coordinates, stock: u32, daily: u32, minimum: u32) -> Facility {
    Facility {
        id: id.to_string(),
        name: id.to_string(),
        address: String::new(),
        contact: String::new(),
        coordinates,
        stock_levels: [(DRUG.to_string(), stock)].into_iter().collect(),
        profile: FacilityProfile::Hospital(ConsumptionProfile {
            capacity: 2_000,
            daily_consumption: [(DRUG.to_string(), daily)].into_iter().collect(),
            minimum_stock: [(DRUG.to_string(), minimum)].into_iter().collect(),
        }),
    }
}

fn distributor(id: &str, coordinates: Coordinates, stock: u32) -> Facility {
    Facility {
        id: id.to_string(),
        name: id.to_string(),
        address: String::new(),
        contact: String::new(),
        coordinates,
        stock_levels: [(DRUG.to_string(), stock)].into_iter().collect(),
        profile: FacilityProfile::Distributor { capacity: 50_000, delivery_radius_miles: 100.0 },
    }
}

#[test]
fn critical_hospital_gets_week_of_cover() {
    let registry = FacilityRegistry::new(vec![consumption_point("HOSP1", Coordinates::new(37.78, -122.41), 40, 15, 60)]).unwrap();

    let alerts = detect_stockouts(&registry, 7).unwrap();

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].days_until_stockout, 2);
    assert_eq!(alerts[0].urgency, Urgency::Critical);
    assert_eq!(alerts[0].required_quantity, 105);
}

#[test]
fn nearby_distributor_eta_and_cost() {
    let eta = estimate_eta_hours(10.0, TransportMode::Truck);
    assert_abs_diff_eq!(eta, 0.7222, epsilon = 1e-4);
    assert_abs_diff_eq!(calculate_cost(10.0, 105, TransportMode::Truck), 80.25, epsilon = 1e-9);
}

#[test]
fn critical_alert_resolved_by_distributor() {
    let home = Coordinates::new(37.78, -122.41);
    let registry = FacilityRegistry::new(vec![
        consumption_point("HOSP1", home, 40, 15, 60),
        distributor("DIST1", Coordinates::new(37.80, -122.27), 8_000),
    ])
    .unwrap();

    let alerts = detect_stockouts(&registry, 7).unwrap();
    let sources = find_optimal_sources(&alerts[0], &registry);

    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].priority_tier, PriorityTier::Distributor);
    assert_eq!(sources[0].can_fulfill, 105);
}

#[test]
fn comfortable_network_has_nothing_to_route() {
    let registry = FacilityRegistry::new(vec![
        consumption_point("HOSP1", Coordinates::new(37.78, -122.41), 5_000, 10, 100),
        distributor("DIST1", Coordinates::new(37.80, -122.27), 8_000),
    ])
    .unwrap();

    assert!(detect_stockouts(&registry, 7).unwrap().is_empty());
    let config = RedistributionConfig { simulations: 10, ..RedistributionConfig::default() };
    assert!(plan_redistribution(&registry, &config).unwrap().is_empty());
}

#[test]
fn every_imminent_pair_is_reported() {
    let registry = FacilityRegistry::builtin();
    let alerts = detect_stockouts(&registry, 7).unwrap();

    for facility in registry.facilities().iter().filter(|f| f.kind().is_consumption_point()) {
        for (drug_id, &stock) in &facility.stock_levels {
            let daily = facility.daily_consumption_of(drug_id);
            if daily > 0 && stock / daily <= 7 {
                assert!(
                    alerts.iter().any(|a| a.facility_id == facility.id && &a.drug_id == drug_id),
                    "missing alert for {} / {}",
                    facility.id,
                    drug_id
                );
            }
        }
    }
}

#[test]
fn builtin_network_end_to_end() {
    let registry = FacilityRegistry::builtin();
    let alerts = detect_stockouts(&registry, 7).unwrap();
    assert!(alerts.windows(2).all(|w| w[0].days_until_stockout <= w[1].days_until_stockout));

    for alert in &alerts {
        let sources = find_optimal_sources(alert, &registry);
        assert!(!sources.is_empty(), "no source for {} / {}", alert.facility_id, alert.drug_id);
        assert!(sources.windows(2).all(|w| w[0].score >= w[1].score));
        for source in &sources {
            assert!(source.can_fulfill <= alert.required_quantity);
            assert!(source.can_fulfill <= source.available_stock);
            let d = haversine_miles(alert.coordinates, source.coordinates);
            assert_abs_diff_eq!(d, haversine_miles(source.coordinates, alert.coordinates), epsilon = 1e-9);
        }
    }

    assert_eq!(detect_stockouts(&registry, 7).unwrap(), alerts);
}
