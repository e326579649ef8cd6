//! Hot reload of the simulator settings.
//!
//! # Responsibilities
//! - Re-read the config file when it is modified or re-created
//! - Forward the new `[source]` section to the running simulator
//! - Flag `[detector]` changes, which cannot be applied to a live window
//!
//! # Design Decisions
//! - Invalid files are logged and ignored; the simulator keeps its settings
//! - Detector changes still forward the source section; only the detector
//!   part waits for a restart

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::{DetectorConfig, SourceConfig};

/// What one reload attempt did.
#[derive(Debug)]
pub enum ReloadOutcome {
    /// Source settings forwarded, detector settings unchanged.
    Applied,
    /// Source settings forwarded, but the detector section differs from the running one.
    DetectorChanged,
    /// File could not be loaded or failed validation; nothing forwarded.
    Rejected(ConfigError),
    /// The simulator is gone.
    Closed,
}

/// Watches the config file and feeds source updates to the simulator.
pub struct ConfigWatcher {
    path: PathBuf,
    /// Detector settings the running detector was built with.
    detector: DetectorConfig,
    source_tx: mpsc::UnboundedSender<SourceConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiver to pass to `Simulator::run`.
    pub fn new(path: &Path, detector: DetectorConfig) -> (Self, mpsc::UnboundedReceiver<SourceConfig>) {
        let (source_tx, source_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            detector,
            source_tx,
        };
        (watcher, source_rx)
    }

    /// Load the file once and forward its source section.
    pub fn reload(&self) -> ReloadOutcome {
        let config = match load_config(&self.path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(path = ?self.path, "Failed to reload config: {}. Keeping current settings.", e);
                return ReloadOutcome::Rejected(e);
            }
        };

        let detector_changed = config.detector != self.detector;
        if detector_changed {
            tracing::warn!(path = ?self.path, "Detector settings changed; restart to apply them");
        }

        if self.source_tx.send(config.source).is_err() {
            return ReloadOutcome::Closed;
        }
        tracing::info!(path = ?self.path, "Simulator settings forwarded");

        if detector_changed {
            ReloadOutcome::DetectorChanged
        } else {
            ReloadOutcome::Applied
        }
    }

    /// Start watching. The returned handle must be kept alive for reloads to happen.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    self.reload();
                }
                Ok(_) => {}
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}
