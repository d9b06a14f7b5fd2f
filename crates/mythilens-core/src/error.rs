use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("invalid coordinate: lat {lat}, lng {lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("search radius must be finite and positive, got {0}")]
    InvalidRadius(f64),

    #[error("reputation score must be within [0, 100], got {0}")]
    InvalidReputation(f64),

    #[error("{field} must be a finite score within [0, 10], got {value}")]
    InvalidScore { field: String, value: f64 },

    #[error("unrecognized action: {0:?}")]
    UnrecognizedAction(String),

    #[error("cannot {action} when {from}")]
    InvalidTransition { from: String, action: String },

    #[error("step {step} is out of range for a path of {steps} steps")]
    UnknownStep { step: usize, steps: usize },
}
