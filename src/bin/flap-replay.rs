use std::path::PathBuf;

use clap::Parser;

use flap_detector::config::{load_config, FlapConfig};
use flap_detector::detector::{FlappingDetector, SharedDetector, Transition};
use flap_detector::observability::logging;
use flap_detector::source::SequenceSource;

#[derive(Parser)]
#[command(name = "flap-replay")]
#[command(about = "Replay a recorded health stream through the flapping detector", long_about = None)]
struct Cli {
    /// File with one observation per line.
    file: PathBuf,

    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    good: Option<String>,

    #[arg(long)]
    bad: Option<String>,

    #[arg(long)]
    nominal_ratio: Option<f64>,

    #[arg(long)]
    window_margin: Option<f64>,

    #[arg(long)]
    max_window_length: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => FlapConfig::default(),
    };
    logging::init(&config.observability.log_level);

    let mut detector_config = config.detector;
    if let Some(good) = cli.good {
        detector_config.good_value = good;
    }
    if let Some(bad) = cli.bad {
        detector_config.bad_value = bad;
    }
    if let Some(ratio) = cli.nominal_ratio {
        detector_config.nominal_ratio = ratio;
    }
    if let Some(margin) = cli.window_margin {
        detector_config.window_margin = margin;
    }
    if let Some(len) = cli.max_window_length {
        detector_config.max_window_length = len;
    }

    let params = detector_config.params();
    let mut detector = FlappingDetector::new(
        detector_config.good_value,
        detector_config.bad_value,
        params,
    )?;
    detector.subscribe(|t: &Transition| match serde_json::to_string(t) {
        Ok(line) => println!("{}", line),
        Err(e) => tracing::error!("Failed to encode transition: {}", e),
    });

    let source = SequenceSource::from_file(&cli.file)?;
    tracing::info!(file = ?cli.file, observations = source.len(), "Replaying");

    let shared = SharedDetector::new(detector);
    source.drive(&shared);

    println!("{}", serde_json::to_string_pretty(&shared.snapshot())?);
    Ok(())
}
