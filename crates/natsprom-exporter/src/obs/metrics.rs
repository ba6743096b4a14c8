//! In-process metrics registry for the exporter.
//!
//! Counter and gauge types store `f64` values as bit patterns inside
//! `AtomicU64`, so the poller can update them while `/metrics` handlers read
//! concurrently without a lock. Labelled families are backed by `DashMap`;
//! labels are flattened into sorted key vectors and rendered in sorted order
//! so the exposition output is deterministic.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

/// Exposition namespace shared by every family.
pub const NAMESPACE: &str = "natsio";

/// Traffic direction label (`direction="in"|"out"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::In, Direction::Out];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Format a sample value the way Prometheus parses it.
fn fmt_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "+Inf".to_string() } else { "-Inf".to_string() }
    } else {
        v.to_string()
    }
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn write_header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

/// `f64` cell with lock-free read-modify-write.
#[derive(Debug)]
struct AtomicF64(AtomicU64);

impl AtomicF64 {
    fn new(v: f64) -> Self {
        Self(AtomicU64::new(v.to_bits()))
    }

    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn store(&self, v: f64) {
        self.0.store(v.to_bits(), Ordering::Relaxed);
    }

    fn add(&self, v: f64) {
        // The closure never returns None, so fetch_update cannot fail.
        let _ = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                Some((f64::from_bits(bits) + v).to_bits())
            });
    }
}

impl Default for AtomicF64 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicF64>,
}

impl CounterVec {
    /// Create the series for `labels` at zero if it does not exist yet.
    pub fn touch(&self, labels: &[(&str, &str)]) {
        self.map.entry(label_key(labels)).or_insert_with(AtomicF64::default);
    }

    /// Increment by an arbitrary value. The value is not validated.
    pub fn add(&self, labels: &[(&str, &str)], v: f64) {
        let counter = self.map.entry(label_key(labels)).or_insert_with(AtomicF64::default);
        counter.add(v);
    }

    /// Current value of one series.
    pub fn get(&self, labels: &[(&str, &str)]) -> Option<f64> {
        self.map.get(&label_key(labels)).map(|c| c.load())
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "counter");
        let mut rows: Vec<(String, f64)> = self
            .map
            .iter()
            .map(|r| {
                let label_str = r
                    .key()
                    .iter()
                    .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                    .collect::<Vec<_>>()
                    .join(",");
                (label_str, r.value().load())
            })
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        for (label_str, val) in rows {
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str, fmt_value(val));
        }
    }
}

/// Unlabelled point-in-time value.
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicF64,
}

impl Gauge {
    /// Overwrite the stored value.
    pub fn set(&self, v: f64) {
        self.value.store(v);
    }

    pub fn get(&self) -> f64 {
        self.value.load()
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        write_header(out, name, help, "gauge");
        let _ = writeln!(out, "{} {}", name, fmt_value(self.get()));
    }
}

/// The exporter's whole metric state.
///
/// Constructed once at startup and shared by `Arc` between the poller (sole
/// writer) and the HTTP handlers (readers).
pub struct ExporterMetrics {
    pub bytes_total: CounterVec,
    pub msg_total: CounterVec,
    pub connections: Gauge,
    pub slow_consumers: Gauge,
}

impl ExporterMetrics {
    /// All families start at zero, including both `direction` series.
    pub fn new() -> Self {
        let m = Self {
            bytes_total: CounterVec::default(),
            msg_total: CounterVec::default(),
            connections: Gauge::default(),
            slow_consumers: Gauge::default(),
        };
        for d in Direction::ALL {
            m.bytes_total.touch(&[("direction", d.as_str())]);
            m.msg_total.touch(&[("direction", d.as_str())]);
        }
        m
    }

    pub fn bytes(&self, d: Direction) -> f64 {
        self.bytes_total
            .get(&[("direction", d.as_str())])
            .unwrap_or_default()
    }

    pub fn msgs(&self, d: Direction) -> f64 {
        self.msg_total
            .get(&[("direction", d.as_str())])
            .unwrap_or_default()
    }

    /// Render all families.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.bytes_total.render(
            &format!("{NAMESPACE}_bytes_total"),
            "Total bytes in and out",
            &mut out,
        );
        self.msg_total.render(
            &format!("{NAMESPACE}_msg_total"),
            "Total messages in and out",
            &mut out,
        );
        self.connections.render(
            &format!("{NAMESPACE}_connections"),
            "Current active connections to gnatsd deamon",
            &mut out,
        );
        self.slow_consumers.render(
            &format!("{NAMESPACE}_slow_consumers"),
            "Amount of slow consumers",
            &mut out,
        );
        out
    }
}

impl Default for ExporterMetrics {
    fn default() -> Self {
        Self::new()
    }
}
