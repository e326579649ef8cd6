//! Shutdown coordination for the simulator and its consumers.
//!
//! # Responsibilities
//! - Fan a single stop request out to every running task
//! - Tell each task why it is stopping, so the stop can be logged once
//!
//! # Design Decisions
//! - Broadcast with capacity 1: only the first reason matters
//! - Triggering with no subscribers is not an error

use std::fmt;

use tokio::sync::broadcast;

/// Why a run is ending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT or SIGTERM from the operator.
    Signal,
    /// Stopped programmatically (tests, embedding code).
    Requested,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Signal => f.write_str("signal"),
            ShutdownReason::Requested => f.write_str("requested"),
        }
    }
}

/// Coordinator for graceful shutdown.
///
/// The simulator loop and the transition printer each hold a receiver;
/// `trigger` wakes all of them with the same reason.
pub struct Shutdown {
    /// Sender side of the stop broadcast; receivers come from `subscribe`.
    tx: broadcast::Sender<ShutdownReason>,
}

impl Shutdown {
    /// Create a coordinator with no subscribers yet.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to hand to a long-running task such as `Simulator::run`.
    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownReason> {
        self.tx.subscribe()
    }

    /// Ask every subscribed task to stop.
    pub fn trigger(&self, reason: ShutdownReason) {
        tracing::debug!(%reason, subscribers = self.tx.receiver_count(), "Shutdown triggered");
        let _ = self.tx.send(reason);
    }

    /// Number of tasks still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
