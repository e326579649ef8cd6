//! Flapping detector state machine.
//!
//! # States
//! - Good: ratio at or above nominal, window trimmed in pairs once over the cap
//! - Bad: ratio fell below nominal, baseline tracked once the ratio settles
//! - Recovering: ratio climbed past the midpoint between baseline and nominal
//!
//! # Design Decisions
//! - The previous ratio is optional; before the first observation there is
//!   nothing to compare against, so every comparison with it is "no"
//! - Listeners run synchronously inside `ingest`
//! - Window length is bounded by `max_window_length` after every ingest

use std::fmt;

use serde::Serialize;

use crate::detector::listener::StateListener;
use crate::detector::mode::{Mode, ObservationClass, Transition};
use crate::detector::window::Window;
use crate::detector::DetectorError;
use crate::observability::metrics;

/// Tunables for a detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorParams {
    /// Ratio at or above which the service is fully healthy.
    pub nominal_ratio: f64,
    /// Tolerance band around the previous ratio used by the Bad-mode shrink.
    pub window_margin: f64,
    /// Upper bound on window length.
    pub max_window_length: usize,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            nominal_ratio: 0.98,
            window_margin: 0.02,
            max_window_length: 100,
        }
    }
}

impl DetectorParams {
    /// Every range violation, window cap first.
    pub fn check(&self) -> Vec<DetectorError> {
        let mut errors = Vec::new();
        if self.max_window_length == 0 {
            errors.push(DetectorError::InvalidWindowLength);
        }
        if !self.nominal_ratio.is_finite() || self.nominal_ratio <= 0.0 || self.nominal_ratio > 1.0 {
            errors.push(DetectorError::InvalidRatio {
                name: "nominal_ratio",
                value: self.nominal_ratio,
            });
        }
        if !self.window_margin.is_finite() || self.window_margin < 0.0 {
            errors.push(DetectorError::InvalidRatio {
                name: "window_margin",
                value: self.window_margin,
            });
        }
        errors
    }

    pub fn validate(&self) -> Result<(), DetectorError> {
        match self.check().into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Point-in-time view of the detector state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectorSnapshot {
    pub mode: Mode,
    pub ratio: Option<f64>,
    pub last_ratio: Option<f64>,
    pub average_ratio: f64,
    pub settled: bool,
    pub window_len: usize,
    pub observations: u64,
}

/// Windowed good/bad ratio tracker with hysteresis between modes.
pub struct FlappingDetector<T> {
    good: T,
    bad: T,
    params: DetectorParams,
    window: Window<T>,
    mode: Mode,
    last_ratio: Option<f64>,
    average_ratio: f64,
    settled: bool,
    observations: u64,
    listeners: Vec<Box<dyn StateListener>>,
}

impl<T: PartialEq> FlappingDetector<T> {
    /// Create a detector in Good mode with an empty window.
    pub fn new(good: T, bad: T, params: DetectorParams) -> Result<Self, DetectorError> {
        if good == bad {
            return Err(DetectorError::AmbiguousValues);
        }
        params.validate()?;

        Ok(Self {
            good,
            bad,
            params,
            window: Window::with_capacity(params.max_window_length + 2),
            mode: Mode::Good,
            last_ratio: None,
            average_ratio: 1.0,
            settled: false,
            observations: 0,
            listeners: Vec::new(),
        })
    }

    /// Register a state-change listener. Listeners fire in registration order.
    pub fn subscribe<L: StateListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    pub fn classify(&self, observation: &T) -> ObservationClass {
        if *observation == self.good {
            ObservationClass::Good
        } else if *observation == self.bad {
            ObservationClass::Bad
        } else {
            ObservationClass::Other
        }
    }

    /// Feed one observation. Returns the transition it fired, if any.
    pub fn ingest(&mut self, observation: T) -> Option<Transition> {
        metrics::record_observation(self.classify(&observation));

        self.window.push(observation);
        self.observations += 1;

        let ratio = self.window.ratio(&self.good)?;
        let last = self.last_ratio;

        let next = match self.mode {
            Mode::Good => self.step_good(ratio),
            Mode::Recovering => self.step_recovering(ratio, last),
            Mode::Bad => self.step_bad(ratio, last),
        };

        self.window.truncate_front(self.params.max_window_length);
        self.last_ratio = Some(ratio);

        tracing::trace!(
            mode = %self.mode,
            ratio,
            average_ratio = self.average_ratio,
            settled = self.settled,
            window_len = self.window.len(),
            "Observation ingested"
        );

        let transition = next.map(|to| self.enter(to, ratio));
        metrics::record_detector_state(self.mode, self.window.ratio(&self.good), self.window.len());
        transition
    }

    fn step_good(&mut self, ratio: f64) -> Option<Mode> {
        if ratio < self.params.nominal_ratio {
            return Some(Mode::Bad);
        }
        if self.window.len() > self.params.max_window_length {
            // Two shifts: sheds slack left behind by a recovery episode
            self.window.evict(2);
        }
        None
    }

    fn step_recovering(&mut self, ratio: f64, last: Option<f64>) -> Option<Mode> {
        if last.is_some_and(|last| ratio > last) {
            self.window.evict(1);
        }
        if ratio >= self.params.nominal_ratio {
            self.average_ratio = self.params.nominal_ratio;
            return Some(Mode::Good);
        }
        None
    }

    fn step_bad(&mut self, ratio: f64, last: Option<f64>) -> Option<Mode> {
        let Some(last) = last else {
            self.settled = false;
            return None;
        };

        self.settled = ratio == last;
        if self.settled {
            self.average_ratio = ratio;
        }

        let mut next = None;
        if ratio > last && ratio > self.recovery_threshold() {
            next = Some(Mode::Recovering);
        }

        let margin = self.params.window_margin;
        if ratio >= last - margin && ratio <= last + margin {
            self.window.evict(1);
        }
        next
    }

    fn enter(&mut self, to: Mode, ratio: f64) -> Transition {
        let transition = Transition {
            from: self.mode,
            to,
            ratio,
            average_ratio: self.average_ratio,
            window_len: self.window.len(),
            sequence: self.observations,
        };
        self.mode = to;

        metrics::record_transition(&transition);
        for listener in self.listeners.iter_mut() {
            listener.on_state_change(&transition);
        }
        transition
    }

    /// Midpoint between the settled baseline and nominal.
    pub fn recovery_threshold(&self) -> f64 {
        (self.params.nominal_ratio - self.average_ratio) / 2.0 + self.average_ratio
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Ratio of the window as it stands now.
    pub fn ratio(&self) -> Option<f64> {
        self.window.ratio(&self.good)
    }

    /// Ratio computed by the most recent ingest.
    pub fn last_ratio(&self) -> Option<f64> {
        self.last_ratio
    }

    pub fn average_ratio(&self) -> f64 {
        self.average_ratio
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn window(&self) -> &Window<T> {
        &self.window
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    pub fn observations(&self) -> u64 {
        self.observations
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    pub fn snapshot(&self) -> DetectorSnapshot {
        DetectorSnapshot {
            mode: self.mode,
            ratio: self.ratio(),
            last_ratio: self.last_ratio,
            average_ratio: self.average_ratio,
            settled: self.settled,
            window_len: self.window.len(),
            observations: self.observations,
        }
    }
}

impl<T> fmt::Debug for FlappingDetector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlappingDetector")
            .field("params", &self.params)
            .field("mode", &self.mode)
            .field("last_ratio", &self.last_ratio)
            .field("average_ratio", &self.average_ratio)
            .field("settled", &self.settled)
            .field("observations", &self.observations)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
