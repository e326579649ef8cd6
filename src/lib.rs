//! Flapping detection for binary health streams.
//!
//! A [`FlappingDetector`] turns a stream of good/bad observations into a
//! Good / Bad / Recovering verdict, smoothing out oscillation with a
//! bounded window and hysteresis between modes. A [`Simulator`] produces
//! realistic flapping patterns for manual runs.

pub mod config;
pub mod detector;
pub mod source;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::FlapConfig;
pub use detector::{FlappingDetector, Mode, SharedDetector, StateListener, Transition};
pub use lifecycle::Shutdown;
pub use source::{ObservationSink, Simulator};
