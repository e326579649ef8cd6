//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast ShutdownReason → simulator loop exits → summary printed
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Every long-running task subscribes to the same broadcast
//! - Reaching the observation cap ends the run the same way as a signal

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownReason};
