//! State-change listeners.
//!
//! # Responsibilities
//! - Define the subscriber interface invoked on every transition
//! - Provide logging and channel-forwarding subscribers
//!
//! # Design Decisions
//! - Listeners are called synchronously while the detector is borrowed;
//!   they must not block
//! - Any `FnMut(&Transition)` closure is a listener

use tokio::sync::mpsc;

use crate::detector::mode::{Mode, Transition};

/// Receives every state change fired by a detector.
pub trait StateListener: Send {
    fn on_state_change(&mut self, transition: &Transition);
}

impl<F> StateListener for F
where
    F: FnMut(&Transition) + Send,
{
    fn on_state_change(&mut self, transition: &Transition) {
        self(transition)
    }
}

/// Logs transitions through `tracing`.
#[derive(Debug, Clone)]
pub struct LogListener {
    service: String,
}

impl LogListener {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

impl StateListener for LogListener {
    fn on_state_change(&mut self, t: &Transition) {
        match t.to {
            Mode::Bad => tracing::warn!(
                service = %self.service,
                from = %t.from,
                ratio = t.ratio,
                window_len = t.window_len,
                sequence = t.sequence,
                "Service went bad"
            ),
            Mode::Recovering => tracing::info!(
                service = %self.service,
                ratio = t.ratio,
                average_ratio = t.average_ratio,
                sequence = t.sequence,
                "Service recovering"
            ),
            Mode::Good => tracing::info!(
                service = %self.service,
                ratio = t.ratio,
                sequence = t.sequence,
                "Service back to good"
            ),
        }
    }
}

/// Forwards transitions to an async consumer.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    tx: mpsc::UnboundedSender<Transition>,
}

impl ChannelListener {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Transition>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl StateListener for ChannelListener {
    fn on_state_change(&mut self, transition: &Transition) {
        // Receiver gone means nobody is consuming; drop the event
        let _ = self.tx.send(transition.clone());
    }
}
