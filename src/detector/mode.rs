//! Detector modes and transition records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Current health verdict for the monitored service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "bad")]
    Bad,
    #[serde(rename = "recovery")]
    Recovering,
}

impl Mode {
    /// Name delivered to state-change listeners.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Good => "good",
            Mode::Bad => "bad",
            Mode::Recovering => "recovery",
        }
    }

    /// Numeric encoding used for the mode gauge.
    pub fn gauge_value(&self) -> f64 {
        match self {
            Mode::Good => 0.0,
            Mode::Recovering => 1.0,
            Mode::Bad => 2.0,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a single observation was classified against the sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationClass {
    Good,
    Bad,
    /// Neither sentinel. Occupies a window slot but never counts as good.
    Other,
}

impl ObservationClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationClass::Good => "good",
            ObservationClass::Bad => "bad",
            ObservationClass::Other => "other",
        }
    }
}

/// A fired state change, handed to every listener.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub from: Mode,
    pub to: Mode,
    /// Ratio computed for the observation that fired the rule.
    pub ratio: f64,
    /// Baseline after the rule was applied.
    pub average_ratio: f64,
    /// Window length once the observation was fully processed.
    pub window_len: usize,
    /// 1-based index of the observation in the ingest history.
    pub sequence: u64,
}
