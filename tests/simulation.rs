//! Simulator wired to a shared detector.

use std::time::Duration;

use tokio::sync::mpsc;

use flap_detector::config::{SourceConfig, StateWeights};
use flap_detector::detector::{ChannelListener, DetectorParams, FlappingDetector, Mode, SharedDetector};
use flap_detector::lifecycle::{Shutdown, ShutdownReason};
use flap_detector::source::Simulator;

fn states(good_odds: f64) -> Vec<StateWeights> {
    vec![
        StateWeights {
            value: "1".into(),
            odds: vec![good_odds],
        },
        StateWeights {
            value: "0".into(),
            odds: vec![1.0 - good_odds],
        },
    ]
}

fn shared() -> SharedDetector<String> {
    let d = FlappingDetector::new("1".to_string(), "0".to_string(), DetectorParams::default()).unwrap();
    SharedDetector::new(d)
}

#[tokio::test]
async fn test_outage_is_reported_once() {
    let detector = shared();
    let (listener, mut transitions) = ChannelListener::new();
    detector.subscribe(listener);

    let config = SourceConfig {
        stream_interval_ms: 1,
        max_observations: Some(50),
        seed: Some(1),
        states: states(0.0),
        ..Default::default()
    };
    let shutdown = Shutdown::new();
    let (_updates_tx, updates) = mpsc::unbounded_channel();
    let emitted = Simulator::new(config)
        .unwrap()
        .run(detector.clone(), updates, shutdown.subscribe())
        .await;

    assert_eq!(emitted, 50);
    let snap = detector.snapshot();
    assert_eq!(snap.observations, 50);
    assert_eq!(snap.mode, Mode::Bad);

    let t = transitions.try_recv().unwrap();
    assert_eq!(t.to, Mode::Bad);
    assert_eq!(t.sequence, 1);
    assert!(transitions.try_recv().is_err());
}

#[tokio::test]
async fn test_shutdown_stops_the_stream() {
    let detector = shared();
    let config = SourceConfig {
        stream_interval_ms: 1,
        seed: Some(2),
        states: states(0.9),
        ..Default::default()
    };
    let shutdown = Shutdown::new();
    let (_updates_tx, updates) = mpsc::unbounded_channel();
    let task = tokio::spawn(
        Simulator::new(config)
            .unwrap()
            .run(detector.clone(), updates, shutdown.subscribe()),
    );

    tokio::time::sleep(Duration::from_millis(30)).await;
    shutdown.trigger(ShutdownReason::Requested);
    let emitted = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("simulator did not stop")
        .unwrap();

    assert_eq!(detector.snapshot().observations, emitted);
}

#[tokio::test]
async fn test_reloaded_odds_take_effect() {
    let detector = shared();
    let config = SourceConfig {
        stream_interval_ms: 1,
        seed: Some(3),
        states: states(1.0),
        ..Default::default()
    };
    let shutdown = Shutdown::new();
    let (updates_tx, updates) = mpsc::unbounded_channel();
    let task = tokio::spawn(
        Simulator::new(config.clone())
            .unwrap()
            .run(detector.clone(), updates, shutdown.subscribe()),
    );

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(detector.mode(), Mode::Good);

    updates_tx
        .send(SourceConfig {
            states: states(0.0),
            ..config
        })
        .unwrap();

    let went_bad = tokio::time::timeout(Duration::from_secs(5), async {
        while detector.mode() != Mode::Bad {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(went_bad.is_ok());

    shutdown.trigger(ShutdownReason::Requested);
    task.await.unwrap();
}
