/// Demand sampling module
/// Daily consumption is modelled as a normal distribution around the facility's
/// recorded daily consumption, with spread given as a coefficient of variation

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{RedistributionError, Result};

/// Build the daily demand distribution for a mean consumption and coefficient of variation
pub fn demand_distribution(mean_daily: f64, cv: f64) -> Result<Normal<f64>> {
    if !mean_daily.is_finite() || mean_daily < 0.0 {
        return Err(RedistributionError::Distribution(format!("mean daily demand {} is not valid", mean_daily)));
    }
    Normal::from_mean_cv(mean_daily, cv).map_err(|e| RedistributionError::Distribution(e.to_string()))
}

/// Sample one day of demand in whole units
pub fn sample_daily_demand<R: Rng + ?Sized>(rng: &mut R, distribution: &Normal<f64>) -> u32 {
    let demand = distribution.sample(rng);
    // Cap at 3 standard deviations above mean to prevent extreme outliers
    let max_reasonable_demand = distribution.mean() + 3.0 * distribution.std_dev();
    demand.clamp(0.0, max_reasonable_demand).round() as u32
}
