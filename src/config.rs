/// Run configuration for a redistribution pass

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detection::DEFAULT_HORIZON_DAYS;
use crate::error::{RedistributionError, Result};

/// Log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedistributionConfig {
    pub horizon_days: u32,
    pub max_sources: usize,        // sources kept per alert
    pub max_alerts: Option<usize>, // None plans every alert
    pub simulations: usize,        // Monte Carlo runs per alert
    pub demand_cv: f64,
    pub seed: u64,
}

impl Default for RedistributionConfig {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            max_sources: 3,
            max_alerts: None,
            simulations: 500,
            demand_cv: 0.2,
            seed: 42,
        }
    }
}

impl RedistributionConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.horizon_days == 0 {
            return Err(RedistributionError::InvalidHorizon(self.horizon_days));
        }
        if self.max_sources == 0 {
            return Err(RedistributionError::InvalidConfig("max_sources must be positive".to_string()));
        }
        if self.simulations == 0 {
            return Err(RedistributionError::InvalidConfig("simulations must be positive".to_string()));
        }
        if !self.demand_cv.is_finite() || self.demand_cv < 0.0 {
            return Err(RedistributionError::InvalidConfig(format!(
                "demand_cv must be a non-negative number, got {}",
                self.demand_cv
            )));
        }
        Ok(())
    }
}
