/// Great-circle distance and delivery time estimates

use serde::{Deserialize, Serialize};

use crate::models::Coordinates;

/// Earth radius in miles
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Fixed loading/unloading time added to every trip, in hours
pub const HANDLING_HOURS: f64 = 0.5;

/// How a shipment travels. Determines both speed and per-mile rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Truck,   // standard rate
    Express,
    Local,   // peer transfers
}

impl TransportMode {
    /// Average speed including traffic, mph
    pub fn speed_mph(self) -> f64 {
        match self {
            TransportMode::Truck => 45.0,
            TransportMode::Express => 65.0,
            TransportMode::Local => 25.0,
        }
    }

    /// Shipping cost per mile, USD
    pub fn rate_per_mile(self) -> f64 {
        match self {
            TransportMode::Truck => 2.5,
            TransportMode::Express => 4.0,
            TransportMode::Local => 1.8,
        }
    }
}

/// Haversine distance between two points in miles
pub fn haversine_miles(from: Coordinates, to: Coordinates) -> f64 {
    let dlat = (to.lat - from.lat).to_radians();
    let dlng = (to.lng - from.lng).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

/// Travel time plus handling, in hours
pub fn estimate_eta_hours(distance_miles: f64, mode: TransportMode) -> f64 {
    distance_miles / mode.speed_mph() + HANDLING_HOURS
}

/// Round to a fixed number of decimal places
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
