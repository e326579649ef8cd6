//! Stochastic observation simulator.
//!
//! # Responsibilities
//! - Emit one weighted-random value per stream tick
//! - Cycle through odds phases on a slower change tick
//! - Pick up new source settings without restarting
//!
//! # Design Decisions
//! - Both tickers share one task; emission never overlaps
//! - First emission and first phase change happen one full period after start

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{broadcast, mpsc};
use tokio::time::{self, Instant, Interval};

use crate::config::schema::SourceConfig;
use crate::lifecycle::ShutdownReason;
use crate::source::bands::{check_states, pick, spread_odds, Band};
use crate::source::{ObservationSink, SourceError};

/// Timer-driven generator of flapping patterns.
#[derive(Debug)]
pub struct Simulator {
    config: SourceConfig,
    phase: usize,
    bands: Vec<Band>,
    rng: StdRng,
    emitted: u64,
}

impl Simulator {
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        validate(&config)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let bands = spread_odds(&config.states, 0);

        Ok(Self {
            config,
            phase: 0,
            bands,
            rng,
            emitted: 0,
        })
    }

    pub fn phase(&self) -> usize {
        self.phase
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    fn phase_count(&self) -> usize {
        self.config.states.first().map_or(1, |s| s.odds.len().max(1))
    }

    /// Roll the next value from the current bands.
    pub fn next_observation(&mut self) -> Option<String> {
        let roll: f64 = self.rng.gen();
        let value = pick(&self.bands, roll).map(|b| b.value.clone())?;
        self.emitted += 1;
        Some(value)
    }

    /// Move to the next odds phase, wrapping after the last one.
    pub fn advance_phase(&mut self) {
        self.phase = (self.phase + 1) % self.phase_count();
        self.bands = spread_odds(&self.config.states, self.phase);
    }

    /// Swap in new settings, keeping the RNG and emission count.
    pub fn apply_config(&mut self, config: SourceConfig) -> Result<(), SourceError> {
        validate(&config)?;
        self.config = config;
        if self.phase >= self.phase_count() {
            self.phase = 0;
        }
        self.bands = spread_odds(&self.config.states, self.phase);
        Ok(())
    }

    fn limit_reached(&self) -> bool {
        self.config
            .max_observations
            .is_some_and(|max| self.emitted >= max)
    }

    fn tickers(&self) -> (Interval, Interval) {
        let stream = Duration::from_millis(self.config.stream_interval_ms);
        let change = Duration::from_millis(self.config.change_interval_ms);
        let now = Instant::now();
        (
            time::interval_at(now + stream, stream),
            time::interval_at(now + change, change),
        )
    }

    /// Drive `sink` until shutdown or the observation cap. Returns the number emitted.
    pub async fn run<S: ObservationSink<String>>(
        mut self,
        sink: S,
        mut updates: mpsc::UnboundedReceiver<SourceConfig>,
        mut shutdown: broadcast::Receiver<ShutdownReason>,
    ) -> u64 {
        tracing::info!(
            stream_interval_ms = self.config.stream_interval_ms,
            change_interval_ms = self.config.change_interval_ms,
            states = self.config.states.len(),
            phases = self.phase_count(),
            "Simulator starting"
        );

        if self.limit_reached() {
            return self.emitted;
        }
        let (mut stream, mut change) = self.tickers();

        loop {
            tokio::select! {
                _ = stream.tick() => {
                    if let Some(value) = self.next_observation() {
                        sink.observe(value);
                    }
                    if self.limit_reached() {
                        tracing::info!(emitted = self.emitted, "Observation limit reached");
                        break;
                    }
                }
                _ = change.tick() => {
                    self.advance_phase();
                    tracing::debug!(phase = self.phase, bands = ?self.bands, "Odds phase changed");
                }
                Some(config) = updates.recv() => {
                    match self.apply_config(config) {
                        Ok(()) => {
                            (stream, change) = self.tickers();
                            tracing::info!(phase = self.phase, "Simulator settings reloaded");
                        }
                        Err(e) => {
                            tracing::error!("Rejected simulator settings: {}. Keeping current settings.", e);
                        }
                    }
                }
                reason = shutdown.recv() => {
                    match reason {
                        Ok(reason) => tracing::info!(%reason, emitted = self.emitted, "Simulator shutting down"),
                        Err(_) => tracing::info!(emitted = self.emitted, "Shutdown channel closed, simulator exiting"),
                    }
                    break;
                }
            }
        }

        self.emitted
    }
}

fn validate(config: &SourceConfig) -> Result<(), SourceError> {
    if config.stream_interval_ms == 0 {
        return Err(SourceError::ZeroInterval("stream_interval_ms"));
    }
    if config.change_interval_ms == 0 {
        return Err(SourceError::ZeroInterval("change_interval_ms"));
    }
    match check_states(&config.states).into_iter().next() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
