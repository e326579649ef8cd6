//! End-to-end detector scenarios over hand-built observation streams.

use flap_detector::detector::{DetectorParams, FlappingDetector, Mode};

mod common;
use common::{detector, feed, Recorder};

#[test]
fn test_steady_good_stream_trims_in_pairs() {
    let mut d = detector();
    let rec = Recorder::default();
    rec.attach(&mut d);

    feed(&mut d, &"1".repeat(100));
    assert_eq!(d.mode(), Mode::Good);
    assert_eq!(d.ratio(), Some(1.0));
    assert_eq!(d.window_len(), 100);

    d.ingest('1');
    assert_eq!(d.window_len(), 99);

    for _ in 0..1_000 {
        let before = d.window_len();
        d.ingest('1');
        if before + 1 > 100 {
            assert_eq!(d.window_len(), before - 1);
        } else {
            assert_eq!(d.window_len(), before + 1);
        }
    }
    assert!(rec.names().is_empty());
}

#[test]
fn test_bad_run_fires_once() {
    let mut d = detector();
    let rec = Recorder::default();
    rec.attach(&mut d);

    feed(&mut d, &"1".repeat(100));
    feed(&mut d, &"0".repeat(98));

    assert_eq!(rec.names(), vec!["bad"]);
    assert_eq!(d.mode(), Mode::Bad);
    // Fired on the third bad observation: 98 good out of 101
    assert_eq!(rec.transitions()[0].sequence, 103);
    assert_eq!(rec.transitions()[0].ratio, 98.0 / 101.0);
    assert!(d.window_len() <= 100);
}

#[test]
fn test_outage_and_recovery_cycle() {
    let mut d = detector();
    let rec = Recorder::default();
    rec.attach(&mut d);

    feed(&mut d, &"1".repeat(100));
    feed(&mut d, &"0".repeat(108));
    assert_eq!(rec.names(), vec!["bad"]);
    assert!(d.is_settled());
    assert_eq!(d.average_ratio(), 0.0);
    assert_eq!(d.window_len(), 100);
    rec.clear();

    // Threshold sits halfway between the settled 0.0 and nominal 0.98
    feed(&mut d, &"1".repeat(49));
    assert_eq!(d.mode(), Mode::Bad);
    assert!(rec.names().is_empty());

    d.ingest('1');
    assert_eq!(rec.names(), vec!["recovery"]);
    assert_eq!(d.mode(), Mode::Recovering);

    feed(&mut d, &"1".repeat(48));
    assert_eq!(d.mode(), Mode::Recovering);

    d.ingest('1');
    assert_eq!(rec.names(), vec!["recovery", "good"]);
    assert_eq!(d.mode(), Mode::Good);
    assert_eq!(d.average_ratio(), 0.98);
}

#[test]
fn test_string_sentinels_and_unknown_values() {
    let mut d = FlappingDetector::new("up", "down", DetectorParams::default()).unwrap();
    for _ in 0..40 {
        d.ingest("up");
    }
    // A timeout is neither up nor down but still dilutes the ratio
    let t = d.ingest("timeout").unwrap();
    assert_eq!(t.to, Mode::Bad);
    assert_eq!(t.ratio, 40.0 / 41.0);
    assert_eq!(d.window().good_count(&"up"), 40);
}

#[test]
fn test_small_window_cap() {
    let params = DetectorParams {
        max_window_length: 4,
        ..Default::default()
    };
    let mut d = FlappingDetector::new('1', '0', params).unwrap();
    for c in "1111110100101111111000011111".chars() {
        d.ingest(c);
        assert!(d.window_len() <= 4);
    }
}
