//! Error types for the apparent-position pipeline

use thiserror::Error;

/// Main error type for starframe
#[derive(Error, Debug)]
pub enum StarframeError {
    /// A time value was not finite or a calendar date did not exist
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    /// Cache capacities must be strictly positive
    #[error("Invalid cache size {0}: capacity must be at least 1")]
    InvalidCacheSize(usize),

    /// The ephemeris has no segment for the requested pair
    #[error("No ephemeris segment for center={center}, target={target}")]
    SegmentNotFound { center: i32, target: i32 },

    /// A segment was evaluated outside the span it covers
    #[error("TT JD {tt} is outside segment coverage ({start}..{end})")]
    OutOfRange { tt: f64, start: f64, end: f64 },

    /// Segment coefficients or spans that cannot be evaluated
    #[error("Invalid segment data: {0}")]
    InvalidSegment(String),

    /// Geodetic coordinates outside their valid domain
    #[error("Invalid observer location: {0}")]
    InvalidLocation(String),

    /// The requested quantity is not defined for this body
    #[error("Unsupported body for {operation}: {body}")]
    UnsupportedBody { operation: String, body: String },

    /// A configuration value failed validation
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for starframe operations
pub type Result<T> = std::result::Result<T, StarframeError>;
