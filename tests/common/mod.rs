//! Shared utilities for integration tests.

use std::sync::{Arc, Mutex};

use flap_detector::detector::{DetectorParams, FlappingDetector, Transition};

/// Detector over single-character observations: '1' good, '0' bad.
pub fn detector() -> FlappingDetector<char> {
    FlappingDetector::new('1', '0', DetectorParams::default()).unwrap()
}

/// Listener that records every transition it sees.
#[derive(Clone, Default)]
pub struct Recorder {
    seen: Arc<Mutex<Vec<Transition>>>,
}

impl Recorder {
    pub fn attach(&self, detector: &mut FlappingDetector<char>) {
        let seen = self.seen.clone();
        detector.subscribe(move |t: &Transition| seen.lock().unwrap().push(t.clone()));
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.seen.lock().unwrap().iter().map(|t| t.to.as_str()).collect()
    }

    #[allow(dead_code)]
    pub fn transitions(&self) -> Vec<Transition> {
        self.seen.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.seen.lock().unwrap().clear();
    }
}

/// Ingest every character of `seq` in order.
pub fn feed(detector: &mut FlappingDetector<char>, seq: &str) {
    for c in seq.chars() {
        detector.ingest(c);
    }
}
