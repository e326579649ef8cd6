//! Metrics collection and exposition.
//!
//! # Metrics
//! - `flap_observations_total` (counter): observations by class (good, bad, other)
//! - `flap_transitions_total` (counter): state changes by target mode
//! - `flap_mode` (gauge): 0=good, 1=recovery, 2=bad
//! - `flap_ratio` (gauge): good ratio of the current window
//! - `flap_window_length` (gauge): current window length
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Prometheus exporter is opt-in

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::detector::{Mode, ObservationClass, Transition};

/// Install the Prometheus recorder and start its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_observation(class: ObservationClass) {
    metrics::counter!("flap_observations_total", "class" => class.as_str()).increment(1);
}

pub fn record_transition(transition: &Transition) {
    metrics::counter!("flap_transitions_total", "to" => transition.to.as_str()).increment(1);
}

pub fn record_detector_state(mode: Mode, ratio: Option<f64>, window_len: usize) {
    metrics::gauge!("flap_mode").set(mode.gauge_value());
    if let Some(ratio) = ratio {
        metrics::gauge!("flap_ratio").set(ratio);
    }
    metrics::gauge!("flap_window_length").set(window_len as f64);
}

#[cfg(test)]
mod tests {
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};

    use crate::detector::{DetectorParams, FlappingDetector};

    type Entry = (
        metrics_util::CompositeKey,
        Option<metrics::Unit>,
        Option<metrics::SharedString>,
        DebugValue,
    );

    fn find<'a>(entries: &'a [Entry], name: &str, label: Option<(&str, &str)>) -> Option<&'a DebugValue> {
        entries.iter().find_map(|(key, _, _, value)| {
            let key = key.key();
            let labelled = match label {
                Some((k, v)) => key.labels().any(|l| l.key() == k && l.value() == v),
                None => true,
            };
            (key.name() == name && labelled).then_some(value)
        })
    }

    #[test]
    fn test_ingest_records_counters_and_gauges() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || {
            let mut d = FlappingDetector::new('1', '0', DetectorParams::default()).unwrap();
            d.ingest('1');
            d.ingest('0');
            d.ingest('x');
        });

        let entries = snapshotter.snapshot().into_vec();
        for class in ["good", "bad", "other"] {
            assert_eq!(
                find(&entries, "flap_observations_total", Some(("class", class))),
                Some(&DebugValue::Counter(1)),
                "class {class}"
            );
        }
        assert_eq!(
            find(&entries, "flap_transitions_total", Some(("to", "bad"))),
            Some(&DebugValue::Counter(1))
        );
        assert_eq!(find(&entries, "flap_transitions_total", Some(("to", "good"))), None);

        match find(&entries, "flap_mode", None) {
            Some(DebugValue::Gauge(mode)) => assert_eq!(mode.0, 2.0),
            other => panic!("unexpected flap_mode entry: {other:?}"),
        }
        match find(&entries, "flap_window_length", None) {
            Some(DebugValue::Gauge(len)) => assert_eq!(len.0, 3.0),
            other => panic!("unexpected flap_window_length entry: {other:?}"),
        }
    }
}
