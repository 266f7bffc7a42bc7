//! Error types for the impact viewer.

use thiserror::Error;

/// Result type alias using ImpactError.
pub type ImpactResult<T> = Result<T, ImpactError>;

/// Primary error type for loading and querying impact data.
#[derive(Debug, Error)]
pub enum ImpactError {
    // === Request Errors ===
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Color scheme not found: {0}")]
    SchemeNotFound(String),

    #[error("Unknown table column: {0}")]
    UnknownColumn(String),

    // === Data Errors ===
    #[error("Failed to decode meteorite records: {0}")]
    MeteoriteDecode(String),

    #[error("Invalid GeoJSON: {0}")]
    GeoJson(String),

    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Data not loaded yet: {0}")]
    NotLoaded(String),

    // === Infrastructure Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ImpactError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            ImpactError::InvalidParameter { .. } | ImpactError::UnknownColumn(_) => 400,

            ImpactError::SchemeNotFound(_) => 404,

            ImpactError::Upstream(_) => 502,
            ImpactError::NotLoaded(_) => 503,

            _ => 500,
        }
    }

    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        ImpactError::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ImpactError {
    fn from(err: std::io::Error) -> Self {
        ImpactError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for ImpactError {
    fn from(err: serde_json::Error) -> Self {
        ImpactError::Internal(format!("JSON error: {}", err))
    }
}
