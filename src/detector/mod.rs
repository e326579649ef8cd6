//! Flapping detection subsystem.
//!
//! # Data Flow
//! ```text
//! Observation ("good" / "bad" / anything else)
//!     → window.rs (append, bounded oldest-first buffer)
//!     → machine.rs (recompute ratio, apply mode rules, shrink window)
//!     → listener.rs (synchronous state-change notification)
//!
//! Concurrent producers:
//!     → shared.rs (one lock around the whole ingest-and-transition step)
//! ```
//!
//! # State Machine
//! ```text
//! Good       → Bad:        ratio < nominal_ratio
//! Bad        → Recovering: ratio rising and above the recovery threshold
//! Recovering → Good:       ratio >= nominal_ratio
//! ```
//!
//! # Design Decisions
//! - Hysteresis between Bad and Good prevents flapping
//! - Ratio is recomputed from the window on every observation
//! - One three-way mode instead of independent good/recovery flags
//! - No time-based logic; flapping is a function of the sequence only

pub mod listener;
pub mod machine;
pub mod mode;
pub mod shared;
pub mod window;

pub use listener::{ChannelListener, LogListener, StateListener};
pub use machine::{DetectorParams, DetectorSnapshot, FlappingDetector};
pub use mode::{Mode, ObservationClass, Transition};
pub use shared::SharedDetector;
pub use window::Window;

use thiserror::Error;

/// Errors raised while constructing a detector.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DetectorError {
    /// Good and bad sentinels compare equal, so observations cannot be classified.
    #[error("good and bad observation values must differ")]
    AmbiguousValues,

    /// The window cap must hold at least one observation.
    #[error("max window length must be greater than zero")]
    InvalidWindowLength,

    /// A ratio parameter is outside its allowed range.
    #[error("invalid {name}: {value}")]
    InvalidRatio { name: &'static str, value: f64 },
}
