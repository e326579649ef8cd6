//! Flapping detector driven by the stochastic simulator.
//!
//! ```text
//!   Simulator ──observe──▶ SharedDetector ──Transition──▶ LogListener
//!       ▲                                           └──▶ ChannelListener ──▶ stdout
//!       │
//!   ConfigWatcher (source settings)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::sync::mpsc;

use flap_detector::config::watcher::ConfigWatcher;
use flap_detector::config::{load_config, FlapConfig};
use flap_detector::detector::{ChannelListener, FlappingDetector, LogListener, SharedDetector, Transition};
use flap_detector::lifecycle::{signals, Shutdown, ShutdownReason};
use flap_detector::observability::{logging, metrics};
use flap_detector::source::Simulator;

#[derive(Parser)]
#[command(name = "flap-detector")]
#[command(about = "Run the flapping detector against a simulated health stream", long_about = None)]
struct Cli {
    /// TOML configuration file (watched for changes).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the simulator RNG.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many observations.
    #[arg(long)]
    max_observations: Option<u64>,

    /// Milliseconds between simulated observations.
    #[arg(long)]
    stream_interval_ms: Option<u64>,

    /// Print transitions as JSON lines.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => FlapConfig::default(),
    };
    if cli.seed.is_some() {
        config.source.seed = cli.seed;
    }
    if cli.max_observations.is_some() {
        config.source.max_observations = cli.max_observations;
    }
    if let Some(ms) = cli.stream_interval_ms {
        config.source.stream_interval_ms = ms;
    }

    logging::init(&config.observability.log_level);
    tracing::info!("flap-detector v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let detector_config = config.detector.clone();
    tracing::info!(
        good = %detector_config.good_value,
        bad = %detector_config.bad_value,
        nominal_ratio = detector_config.nominal_ratio,
        window_margin = detector_config.window_margin,
        max_window_length = detector_config.max_window_length,
        "Configuration loaded"
    );

    let detector = FlappingDetector::new(
        detector_config.good_value.clone(),
        detector_config.bad_value.clone(),
        detector_config.params(),
    )?;
    let shared = SharedDetector::new(detector);
    shared.subscribe(LogListener::new("simulated"));
    let (channel, mut transitions) = ChannelListener::new();
    shared.subscribe(channel);

    let (source_rx, _watcher) = match &cli.config {
        Some(path) => {
            let (watcher, source_rx) = ConfigWatcher::new(path, detector_config.clone());
            (source_rx, Some(watcher.run()?))
        }
        // No file to watch: the simulator keeps its startup settings
        None => (mpsc::unbounded_channel().1, None),
    };

    let shutdown = Shutdown::new();
    let simulator = Simulator::new(config.source.clone())?;
    let mut sim_task = tokio::spawn(simulator.run(shared.clone(), source_rx, shutdown.subscribe()));

    let signal = signals::wait_for_shutdown_signal();
    tokio::pin!(signal);
    let mut stopping = false;

    let emitted = loop {
        tokio::select! {
            Some(transition) = transitions.recv() => print_transition(&transition, cli.json)?,
            res = &mut sim_task => break res?,
            _ = &mut signal, if !stopping => {
                stopping = true;
                shutdown.trigger(ShutdownReason::Signal);
            }
        }
    };
    while let Ok(transition) = transitions.try_recv() {
        print_transition(&transition, cli.json)?;
    }

    let snapshot = shared.snapshot();
    tracing::info!(
        emitted,
        mode = %snapshot.mode,
        window_len = snapshot.window_len,
        average_ratio = snapshot.average_ratio,
        "Shutdown complete"
    );
    Ok(())
}

fn print_transition(transition: &Transition, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string(transition)?);
    } else {
        println!(
            "#{} {} (ratio {:.3}, window {})",
            transition.sequence, transition.to, transition.ratio, transition.window_len
        );
    }
    Ok(())
}
