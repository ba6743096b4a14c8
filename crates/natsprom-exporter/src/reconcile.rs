//! Snapshot → metric state.
//!
//! Counters ADD the snapshot value on every cycle even though NATS reports
//! lifetime totals, so the published counters grow faster than the server's
//! own. This is the long-standing exporter behaviour and dashboards built on
//! `rate()` over it depend on it staying that way. Gauges are overwritten.

use natsprom_core::varz::VarzSnapshot;

use crate::obs::{Direction, ExporterMetrics};

/// Apply one snapshot. Values are not validated; each field update is atomic
/// on its own.
pub fn reconcile(metrics: &ExporterMetrics, snap: &VarzSnapshot) {
    metrics
        .bytes_total
        .add(&[("direction", Direction::In.as_str())], snap.in_bytes);
    metrics
        .bytes_total
        .add(&[("direction", Direction::Out.as_str())], snap.out_bytes);

    metrics
        .msg_total
        .add(&[("direction", Direction::In.as_str())], snap.in_msgs);
    metrics
        .msg_total
        .add(&[("direction", Direction::Out.as_str())], snap.out_msgs);

    metrics.connections.set(snap.connections);
    metrics.slow_consumers.set(snap.slow_consumers);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(in_bytes: f64, out_bytes: f64, in_msgs: f64, out_msgs: f64, conns: f64, slow: f64) -> VarzSnapshot {
        VarzSnapshot {
            in_bytes,
            out_bytes,
            in_msgs,
            out_msgs,
            connections: conns,
            slow_consumers: slow,
            max_connections: 0.0,
        }
    }

    #[test]
    fn same_snapshot_twice_doubles_counters() {
        let m = ExporterMetrics::new();
        let s = snap(100.0, 50.0, 10.0, 5.0, 3.0, 0.0);
        reconcile(&m, &s);
        reconcile(&m, &s);

        assert_eq!(m.bytes(Direction::In), 200.0);
        assert_eq!(m.bytes(Direction::Out), 100.0);
        assert_eq!(m.msgs(Direction::In), 20.0);
        assert_eq!(m.msgs(Direction::Out), 10.0);
        assert_eq!(m.connections.get(), 3.0);
        assert_eq!(m.slow_consumers.get(), 0.0);
    }

    #[test]
    fn counters_sum_and_gauges_keep_last() {
        let m = ExporterMetrics::new();
        let seq = [
            snap(1.5, 2.0, 3.0, 4.0, 10.0, 1.0),
            snap(0.25, 8.0, 0.0, 1.0, 2.0, 7.0),
            snap(1e6, 0.0, 12.0, 0.5, 5.0, 0.0),
        ];
        for s in &seq {
            reconcile(&m, s);
        }

        let sum = |f: fn(&VarzSnapshot) -> f64| seq.iter().map(f).sum::<f64>();
        assert!((m.bytes(Direction::In) - sum(|s| s.in_bytes)).abs() < 1e-9);
        assert!((m.bytes(Direction::Out) - sum(|s| s.out_bytes)).abs() < 1e-9);
        assert!((m.msgs(Direction::In) - sum(|s| s.in_msgs)).abs() < 1e-9);
        assert!((m.msgs(Direction::Out) - sum(|s| s.out_msgs)).abs() < 1e-9);
        assert_eq!(m.connections.get(), 5.0);
        assert_eq!(m.slow_consumers.get(), 0.0);
    }

    #[test]
    fn negative_values_pass_through() {
        let m = ExporterMetrics::new();
        reconcile(&m, &snap(10.0, 0.0, 0.0, 0.0, 4.0, 0.0));
        reconcile(&m, &snap(-3.0, 0.0, 0.0, 0.0, -1.0, 0.0));
        assert_eq!(m.bytes(Direction::In), 7.0);
        assert_eq!(m.connections.get(), -1.0);
    }

    #[test]
    fn max_connections_is_not_exported() {
        let m = ExporterMetrics::new();
        let mut s = snap(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        s.max_connections = 65536.0;
        reconcile(&m, &s);
        assert!(!m.render().contains("65536"));
    }
}
