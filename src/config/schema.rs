//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the detector
//! and its simulator. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

use crate::detector::DetectorParams;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct FlapConfig {
    /// Detector sentinels and tunables.
    pub detector: DetectorConfig,

    /// Simulated observation stream.
    pub source: SourceConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Detector configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DetectorConfig {
    /// Observation value counted as good.
    pub good_value: String,

    /// Observation value counted as bad.
    pub bad_value: String,

    /// Ratio at or above which the service is fully healthy.
    pub nominal_ratio: f64,

    /// Tolerance around the previous ratio for the Bad-mode shrink.
    pub window_margin: f64,

    /// Maximum number of observations kept in the window.
    pub max_window_length: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        let params = DetectorParams::default();
        Self {
            good_value: "1".to_string(),
            bad_value: "0".to_string(),
            nominal_ratio: params.nominal_ratio,
            window_margin: params.window_margin,
            max_window_length: params.max_window_length,
        }
    }
}

impl DetectorConfig {
    pub fn params(&self) -> DetectorParams {
        DetectorParams {
            nominal_ratio: self.nominal_ratio,
            window_margin: self.window_margin,
            max_window_length: self.max_window_length,
        }
    }
}

/// Simulator configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    /// Milliseconds between emitted observations.
    pub stream_interval_ms: u64,

    /// Milliseconds between odds phase changes.
    pub change_interval_ms: u64,

    /// RNG seed for reproducible runs.
    pub seed: Option<u64>,

    /// Stop after this many observations.
    pub max_observations: Option<u64>,

    /// Values the simulator can emit, with per-phase odds.
    pub states: Vec<StateWeights>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            stream_interval_ms: 1000,
            change_interval_ms: 5000,
            seed: None,
            max_observations: None,
            // Good for three phases, bad for one
            states: vec![
                StateWeights {
                    value: "1".to_string(),
                    odds: vec![1.0, 1.0, 1.0, 0.0],
                },
                StateWeights {
                    value: "0".to_string(),
                    odds: vec![0.0, 0.0, 0.0, 1.0],
                },
            ],
        }
    }
}

/// One value the simulator may emit.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StateWeights {
    /// Value broadcast when this state is rolled.
    pub value: String,

    /// Probability per phase. Odds of all states in a phase should add up to 1.
    pub odds: Vec<f64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: FlapConfig = toml::from_str("").unwrap();
        assert_eq!(config, FlapConfig::default());
        assert_eq!(config.detector.params(), DetectorParams::default());
    }

    #[test]
    fn test_partial_sections() {
        let config: FlapConfig = toml::from_str(
            r#"
            [detector]
            good_value = "up"
            bad_value = "down"
            max_window_length = 50

            [source]
            stream_interval_ms = 250
            seed = 42

            [[source.states]]
            value = "up"
            odds = [0.9, 0.5]

            [[source.states]]
            value = "down"
            odds = [0.1, 0.5]
            "#,
        )
        .unwrap();

        assert_eq!(config.detector.good_value, "up");
        assert_eq!(config.detector.nominal_ratio, 0.98);
        assert_eq!(config.detector.max_window_length, 50);
        assert_eq!(config.source.change_interval_ms, 5000);
        assert_eq!(config.source.seed, Some(42));
        assert_eq!(config.source.states.len(), 2);
        assert_eq!(config.observability.log_level, "info");
    }
}
