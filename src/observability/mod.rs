//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Detector and simulator produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging via `tracing` fields
//! - Metrics are cheap and no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
