//! Prometheus metrics for VAHTI

use crate::error::{Result, VahtiError};
use prometheus::{CounterVec, Encoder, Gauge, TextEncoder, register_counter_vec, register_gauge};
use std::sync::OnceLock;

/// Global metrics instance
static METRICS: OnceLock<Metrics> = OnceLock::new();

/// All VAHTI metrics
pub struct Metrics {
    // ─────────────────────────────────────────────────────────────────────────
    // Event counters
    // ─────────────────────────────────────────────────────────────────────────
    /// Events decoded and offered to the queue (by source, type)
    pub events_received: CounterVec,

    /// Events dropped (by reason)
    pub events_dropped: CounterVec,

    /// Rule matches (by rule name)
    pub rule_matches: CounterVec,

    // ─────────────────────────────────────────────────────────────────────────
    // Dispatch
    // ─────────────────────────────────────────────────────────────────────────
    /// Attempted actions (by target, outcome = delivered | failed)
    pub actions: CounterVec,

    // ─────────────────────────────────────────────────────────────────────────
    // Hand-off queue
    // ─────────────────────────────────────────────────────────────────────────
    /// Current number of events waiting in the queue
    pub queue_depth: Gauge,

    /// Queue capacity
    pub queue_capacity: Gauge,
}

impl Metrics {
    /// Initialize metrics (call once at startup)
    ///
    /// Returns error if metric registration fails.
    pub fn init() -> Result<&'static Metrics> {
        if let Some(metrics) = METRICS.get() {
            return Ok(metrics);
        }

        let metrics = Metrics {
            events_received: register_counter_vec!(
                "vahti_events_received_total",
                "Total alarm events decoded from sources",
                &["source", "type"]
            )
            .map_err(|e| VahtiError::Metrics(format!("events_received: {e}")))?,

            events_dropped: register_counter_vec!(
                "vahti_events_dropped_total",
                "Total alarm events dropped",
                &["reason"]
            )
            .map_err(|e| VahtiError::Metrics(format!("events_dropped: {e}")))?,

            rule_matches: register_counter_vec!(
                "vahti_rule_matches_total",
                "Total rule matches",
                &["rule"]
            )
            .map_err(|e| VahtiError::Metrics(format!("rule_matches: {e}")))?,

            actions: register_counter_vec!(
                "vahti_actions_total",
                "Total dispatch actions attempted",
                &["target", "outcome"]
            )
            .map_err(|e| VahtiError::Metrics(format!("actions: {e}")))?,

            queue_depth: register_gauge!(
                "vahti_queue_depth",
                "Current number of events in the hand-off queue"
            )
            .map_err(|e| VahtiError::Metrics(format!("queue_depth: {e}")))?,

            queue_capacity: register_gauge!(
                "vahti_queue_capacity",
                "Hand-off queue capacity"
            )
            .map_err(|e| VahtiError::Metrics(format!("queue_capacity: {e}")))?,
        };

        // Set the metrics (only succeeds once)
        let _ = METRICS.set(metrics);

        METRICS
            .get()
            .ok_or_else(|| VahtiError::Metrics("Failed to initialize metrics".to_string()))
    }

    /// Get the global metrics instance, if initialized
    pub fn get() -> Option<&'static Metrics> {
        METRICS.get()
    }

    pub fn record_received(&self, source: &str, event_type: &str) {
        self.events_received
            .with_label_values(&[source, event_type])
            .inc();
    }

    pub fn record_dropped(&self, reason: &str, count: u64) {
        self.events_dropped
            .with_label_values(&[reason])
            .inc_by(count as f64);
    }

    pub fn record_rule_match(&self, rule: &str) {
        self.rule_matches.with_label_values(&[rule]).inc();
    }

    pub fn record_action(&self, target: &str, success: bool) {
        let outcome = if success { "delivered" } else { "failed" };
        self.actions.with_label_values(&[target, outcome]).inc();
    }

    pub fn set_queue_depth(&self, depth: usize) {
        self.queue_depth.set(depth as f64);
    }

    pub fn set_queue_capacity(&self, capacity: usize) {
        self.queue_capacity.set(capacity as f64);
    }
}

/// Gather all metrics and encode as Prometheus text format
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_ok() {
        String::from_utf8(buffer).unwrap_or_default()
    } else {
        String::new()
    }
}

/// Record a dropped event if metrics are initialized, otherwise skip
pub fn try_record_dropped(reason: &str, count: u64) {
    if let Some(m) = Metrics::get() {
        m.record_dropped(reason, count);
    }
}

/// Record a decoded event if metrics are initialized, otherwise skip
pub fn try_record_received(source: &str, event_type: &str) {
    if let Some(m) = Metrics::get() {
        m.record_received(source, event_type);
    }
}
