//! Thread-safe detector handle.
//!
//! Every ingest runs the append, ratio, transition and shrink steps under one
//! lock, so concurrent producers are serialized per observation.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::detector::listener::StateListener;
use crate::detector::machine::{DetectorSnapshot, FlappingDetector};
use crate::detector::mode::{Mode, Transition};
use crate::source::ObservationSink;

/// Cloneable handle to a detector shared between producers.
#[derive(Debug)]
pub struct SharedDetector<T> {
    inner: Arc<Mutex<FlappingDetector<T>>>,
}

impl<T> Clone for SharedDetector<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: PartialEq> SharedDetector<T> {
    pub fn new(detector: FlappingDetector<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(detector)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FlappingDetector<T>> {
        // Poisoned only by a panicking listener; state is still consistent
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn ingest(&self, observation: T) -> Option<Transition> {
        self.lock().ingest(observation)
    }

    pub fn subscribe<L: StateListener + 'static>(&self, listener: L) {
        self.lock().subscribe(listener);
    }

    pub fn mode(&self) -> Mode {
        self.lock().mode()
    }

    pub fn snapshot(&self) -> DetectorSnapshot {
        self.lock().snapshot()
    }
}

impl<T: PartialEq + Send> ObservationSink<T> for SharedDetector<T> {
    fn observe(&self, value: T) {
        self.ingest(value);
    }
}
