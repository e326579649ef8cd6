//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ratios, window cap, intervals)
//! - Check the simulator state table is usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FlapConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::FlapConfig;
use crate::detector::DetectorError;
use crate::source::bands::check_states;

/// A single rejected setting.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &FlapConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let detector = &config.detector;
    if detector.good_value == detector.bad_value {
        errors.push(ValidationError::new(
            "detector.bad_value",
            format!("must differ from good_value {:?}", detector.good_value),
        ));
    }
    for e in detector.params().check() {
        let field = match &e {
            DetectorError::InvalidRatio { name, .. } => format!("detector.{name}"),
            _ => "detector.max_window_length".to_string(),
        };
        errors.push(ValidationError::new(field, e.to_string()));
    }

    let source = &config.source;
    if source.stream_interval_ms == 0 {
        errors.push(ValidationError::new(
            "source.stream_interval_ms",
            "must be greater than zero",
        ));
    }
    if source.change_interval_ms == 0 {
        errors.push(ValidationError::new(
            "source.change_interval_ms",
            "must be greater than zero",
        ));
    }
    for e in check_states(&source.states) {
        errors.push(ValidationError::new("source.states", e.to_string()));
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address {:?}", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
