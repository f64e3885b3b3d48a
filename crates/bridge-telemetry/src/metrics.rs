//! Prometheus metrics for bus traffic.
//!
//! All metrics follow the naming convention: `bridge_<metric>_<unit>`
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `bridge_frames_sent_total` | counter | `func` |
//! | `bridge_frames_received_total` | counter | `kind` |
//! | `bridge_frames_dropped_total` | counter | `reason` |
//! | `bridge_calls_queued_total` | counter | |
//! | `bridge_calls_flushed_total` | counter | |
//! | `bridge_handshakes_completed_total` | counter | |
//! | `bridge_default_actions_total` | counter | `func` |
//!
//! `func` labels are limited to [`funcs::KNOWN`]; anything else is counted
//! under `other`.

use bridge_bus::{funcs, BusMetrics, DropReason};
use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();
}

/// [`BusMetrics`] backed by Prometheus counters.
#[derive(Clone)]
pub struct PrometheusBusMetrics {
    frames_sent: IntCounterVec,
    frames_received: IntCounterVec,
    frames_dropped: IntCounterVec,
    calls_queued: IntCounter,
    calls_flushed: IntCounter,
    handshakes_completed: IntCounter,
    default_actions: IntCounterVec,
}

fn metric_err(e: prometheus::Error) -> TelemetryError {
    TelemetryError::MetricsInit(e.to_string())
}

impl PrometheusBusMetrics {
    /// Create the counters and register them with `registry`.
    pub fn new(registry: &Registry) -> Result<Self, TelemetryError> {
        let metrics = Self {
            frames_sent: IntCounterVec::new(
                Opts::new("bridge_frames_sent_total", "Outbound frames handed to the transport"),
                &["func"],
            )
            .map_err(metric_err)?,
            frames_received: IntCounterVec::new(
                Opts::new("bridge_frames_received_total", "Inbound frames classified"),
                &["kind"], // kind: response/host_call
            )
            .map_err(metric_err)?,
            frames_dropped: IntCounterVec::new(
                Opts::new("bridge_frames_dropped_total", "Inbound frames dropped"),
                &["reason"], // reason: origin/malformed/unmatched
            )
            .map_err(metric_err)?,
            calls_queued: IntCounter::new(
                "bridge_calls_queued_total",
                "Calls held until the handshake completed",
            )
            .map_err(metric_err)?,
            calls_flushed: IntCounter::new(
                "bridge_calls_flushed_total",
                "Queued calls sent when the handshake completed",
            )
            .map_err(metric_err)?,
            handshakes_completed: IntCounter::new(
                "bridge_handshakes_completed_total",
                "Handshake responses received",
            )
            .map_err(metric_err)?,
            default_actions: IntCounterVec::new(
                Opts::new(
                    "bridge_default_actions_total",
                    "Default actions sent for unhandled host events",
                ),
                &["func"],
            )
            .map_err(metric_err)?,
        };

        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(metrics.frames_sent.clone()),
            Box::new(metrics.frames_received.clone()),
            Box::new(metrics.frames_dropped.clone()),
            Box::new(metrics.calls_queued.clone()),
            Box::new(metrics.calls_flushed.clone()),
            Box::new(metrics.handshakes_completed.clone()),
            Box::new(metrics.default_actions.clone()),
        ];
        for collector in collectors {
            registry.register(collector).map_err(metric_err)?;
        }

        Ok(metrics)
    }
}

impl BusMetrics for PrometheusBusMetrics {
    fn record_frame_sent(&self, func: &str) {
        self.frames_sent
            .with_label_values(&[funcs::metric_label(func)])
            .inc();
    }

    fn record_frame_received(&self, kind: &str) {
        self.frames_received.with_label_values(&[kind]).inc();
    }

    fn record_frame_dropped(&self, reason: DropReason) {
        self.frames_dropped
            .with_label_values(&[reason.as_str()])
            .inc();
    }

    fn record_call_queued(&self) {
        self.calls_queued.inc();
    }

    fn record_queue_flushed(&self, count: usize) {
        self.calls_flushed.inc_by(count as u64);
    }

    fn record_handshake_completed(&self) {
        self.handshakes_completed.inc();
    }

    fn record_default_action(&self, func: &str) {
        self.default_actions
            .with_label_values(&[funcs::metric_label(func)])
            .inc();
    }
}

/// Register the bus counters with the global registry.
///
/// Fails if they are already registered.
pub fn register_metrics() -> Result<Arc<PrometheusBusMetrics>, TelemetryError> {
    PrometheusBusMetrics::new(&REGISTRY).map(Arc::new)
}

/// Encode the global registry as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    encode_registry(&REGISTRY)
}

/// Encode `registry` as Prometheus text format.
pub fn encode_registry(registry: &Registry) -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(metric_err)?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
