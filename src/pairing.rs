use serde::Serialize;
use tracing::info;

use crate::config::RedistributionConfig;
use crate::detection::detect_stockouts;
use crate::error::Result;
use crate::models::{SourceCandidate, StockoutAlert};
use crate::monte_carlo::{estimate_stockout_risk, StockoutRisk};
use crate::optimizer::find_optimal_sources;
use crate::registry::FacilityRegistry;

/// One stockout paired with its best supply sources
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RedistributionPlan {
    pub alert: StockoutAlert,
    pub risk: StockoutRisk,
    pub sources: Vec<SourceCandidate>, // best first, may be empty
}

impl RedistributionPlan {
    pub fn best_source(&self) -> Option<&SourceCandidate> {
        self.sources.first()
    }
}

/// Detect stockouts and pair each one with its top sources.
/// Alerts stay in detection order; an alert without sources still gets a plan.
pub fn plan_redistribution(registry: &FacilityRegistry, config: &RedistributionConfig) -> Result<Vec<RedistributionPlan>> {
    config.validate()?;
    let alerts = detect_stockouts(registry, config.horizon_days)?;
    plan_alerts(registry, &alerts, config)
}

/// Pair alerts that were already detected with their top sources, honoring `max_alerts`
pub fn plan_alerts(
    registry: &FacilityRegistry,
    alerts: &[StockoutAlert],
    config: &RedistributionConfig,
) -> Result<Vec<RedistributionPlan>> {
    config.validate()?;

    let limit = config.max_alerts.unwrap_or(alerts.len()).min(alerts.len());
    let mut plans = Vec::with_capacity(limit);
    for (index, alert) in alerts[..limit].iter().cloned().enumerate() {
        let mut sources = find_optimal_sources(&alert, registry);
        sources.truncate(config.max_sources);

        // each alert gets its own stream so plans don't depend on alert count
        let risk = estimate_stockout_risk(
            &alert,
            config.horizon_days,
            config.simulations,
            config.demand_cv,
            config.seed.wrapping_add(index as u64),
        )?;

        plans.push(RedistributionPlan { alert, risk, sources });
    }

    let unsourced = plans.iter().filter(|p| p.sources.is_empty()).count();
    info!(plans = plans.len(), unsourced, "Redistribution plan ready");
    Ok(plans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConsumptionProfile, Coordinates, DrugUnits, Facility, FacilityProfile};

    fn quick_config() -> RedistributionConfig {
        RedistributionConfig { simulations: 50, ..RedistributionConfig::default() }
    }

    #[test]
    fn test_plan_covers_every_alert() {
        let registry = FacilityRegistry::builtin();
        let config = quick_config();
        let alerts = detect_stockouts(&registry, config.horizon_days).unwrap();
        let plans = plan_redistribution(&registry, &config).unwrap();

        assert_eq!(plans.len(), alerts.len());
        for (plan, alert) in plans.iter().zip(&alerts) {
            assert_eq!(&plan.alert, alert);
            assert!(plan.sources.len() <= config.max_sources);
            assert_eq!(plan.risk.simulations, 50);
        }
    }

    #[test]
    fn test_planning_detected_alerts_matches_full_pass() {
        let registry = FacilityRegistry::builtin();
        let config = RedistributionConfig { max_alerts: Some(3), ..quick_config() };
        let alerts = detect_stockouts(&registry, config.horizon_days).unwrap();

        let plans = plan_alerts(&registry, &alerts, &config).unwrap();
        assert_eq!(plans, plan_redistribution(&registry, &config).unwrap());
        assert_eq!(plans.len(), 3.min(alerts.len()));
    }

    #[test]
    fn test_max_alerts_truncates() {
        let registry = FacilityRegistry::builtin();
        let config = RedistributionConfig { max_alerts: Some(2), ..quick_config() };
        assert_eq!(plan_redistribution(&registry, &config).unwrap().len(), 2);
    }

    #[test]
    fn test_alert_without_sources_still_planned() {
        let lonely = Facility {
            id: "HOSP1".to_string(),
            name: "Remote Clinic".to_string(),
            address: String::new(),
            contact: String::new(),
            coordinates: Coordinates::new(64.8, -147.7),
            stock_levels: DrugUnits::from([("aspirin-100mg".to_string(), 5)]),
            profile: FacilityProfile::Hospital(ConsumptionProfile {
                capacity: 100,
                daily_consumption: DrugUnits::from([("aspirin-100mg".to_string(), 5)]),
                minimum_stock: DrugUnits::new(),
            }),
        };
        let registry = FacilityRegistry::new(vec![lonely]).unwrap();

        let plans = plan_redistribution(&registry, &quick_config()).unwrap();
        assert_eq!(plans.len(), 1);
        assert!(plans[0].sources.is_empty());
        assert!(plans[0].best_source().is_none());
    }

    #[test]
    fn test_plans_are_repeatable() {
        let registry = FacilityRegistry::builtin();
        let config = quick_config();
        assert_eq!(
            plan_redistribution(&registry, &config).unwrap(),
            plan_redistribution(&registry, &config).unwrap()
        );
    }
}
