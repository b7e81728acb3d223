/// Error type shared by registry loading, detection and risk estimation

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RedistributionError {
    #[error("Invalid data for facility '{facility_id}': {reason}")]
    InvalidFacilityData { facility_id: String, reason: String },

    #[error("Duplicate facility id: {0}")]
    DuplicateFacility(String),

    #[error("Unknown facility: {0}")]
    UnknownFacility(String),

    #[error("Detection horizon must be at least one day, got {0}")]
    InvalidHorizon(u32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid demand distribution: {0}")]
    Distribution(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RedistributionError>;
