//! Observation sources.
//!
//! # Data Flow
//! ```text
//! Simulator (simulator.rs):
//!     stream ticker → roll against probability bands (bands.rs) → sink
//!     change ticker → next odds phase → recompute bands
//!     config update → rebuild bands and tickers
//!
//! Replay (sequence.rs):
//!     recorded stream → sink, one value at a time
//! ```
//!
//! # Design Decisions
//! - Sources only know the `ObservationSink` interface, never the detector
//! - One task per simulator, so values arrive in generation order
//! - Seedable RNG for reproducible runs

pub mod bands;
pub mod sequence;
pub mod simulator;

pub use bands::{Band, pick, spread_odds};
pub use sequence::SequenceSource;
pub use simulator::Simulator;

use thiserror::Error;
use tokio::sync::mpsc;

/// Consumer of a stream of observations.
pub trait ObservationSink<T>: Send + Sync {
    fn observe(&self, value: T);
}

impl<T: Send> ObservationSink<T> for mpsc::UnboundedSender<T> {
    fn observe(&self, value: T) {
        let _ = self.send(value);
    }
}

/// Invalid simulator state table.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SourceError {
    #[error("at least one state is required")]
    NoStates,

    #[error("state {value:?} has no odds")]
    NoPhases { value: String },

    #[error("state {value:?} has {actual} odds, expected {expected}")]
    MismatchedOdds {
        value: String,
        expected: usize,
        actual: usize,
    },

    #[error("state {value:?} has invalid odds {odds} in phase {phase}")]
    InvalidOdds { value: String, phase: usize, odds: f64 },

    #[error("odds in phase {phase} add up to {total}, more than 1")]
    OddsOverflow { phase: usize, total: f64 },

    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
}
