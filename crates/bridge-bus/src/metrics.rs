//! Metrics hooks for bus traffic
//!
//! The bus reports every frame it sends, receives, or drops through a
//! [`BusMetrics`] implementation. [`NoOpMetrics`] is the default;
//! [`CountingMetrics`] keeps in-memory counters for tests and diagnostics.
//! Exporters for external systems implement the trait themselves.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Why an inbound frame never reached the correlator or dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropReason {
    /// Origin not accepted by the transport.
    Origin,
    /// Payload failed to decode.
    Malformed,
    /// Neither a pending id nor a function name.
    Unmatched,
}

impl DropReason {
    /// Label value for exporters.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Malformed => "malformed",
            Self::Unmatched => "unmatched",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for custom metrics recording implementations
pub trait BusMetrics: Send + Sync {
    /// An outbound frame was handed to the transport.
    fn record_frame_sent(&self, func: &str);

    /// An inbound frame was classified. `kind` is `response` or `host_call`.
    fn record_frame_received(&self, kind: &str);

    /// An inbound frame was dropped.
    fn record_frame_dropped(&self, reason: DropReason);

    /// A call was held by the readiness gate.
    fn record_call_queued(&self);

    /// The readiness gate flushed `count` calls.
    fn record_queue_flushed(&self, count: usize);

    /// The handshake response arrived.
    fn record_handshake_completed(&self);

    /// A default action or acknowledgment was sent on the application's behalf.
    fn record_default_action(&self, func: &str);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpMetrics;

impl BusMetrics for NoOpMetrics {
    fn record_frame_sent(&self, _func: &str) {}
    fn record_frame_received(&self, _kind: &str) {}
    fn record_frame_dropped(&self, _reason: DropReason) {}
    fn record_call_queued(&self) {}
    fn record_queue_flushed(&self, _count: usize) {}
    fn record_handshake_completed(&self) {}
    fn record_default_action(&self, _func: &str) {}
}

/// In-memory counters.
#[derive(Debug, Default)]
pub struct CountingMetrics {
    pub frames_sent: AtomicU64,
    pub responses_received: AtomicU64,
    pub host_calls_received: AtomicU64,
    pub dropped_origin: AtomicU64,
    pub dropped_malformed: AtomicU64,
    pub dropped_unmatched: AtomicU64,
    pub calls_queued: AtomicU64,
    pub calls_flushed: AtomicU64,
    pub handshakes_completed: AtomicU64,
    pub default_actions: AtomicU64,
}

impl CountingMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            responses_received: self.responses_received.load(Ordering::Relaxed),
            host_calls_received: self.host_calls_received.load(Ordering::Relaxed),
            dropped_origin: self.dropped_origin.load(Ordering::Relaxed),
            dropped_malformed: self.dropped_malformed.load(Ordering::Relaxed),
            dropped_unmatched: self.dropped_unmatched.load(Ordering::Relaxed),
            calls_queued: self.calls_queued.load(Ordering::Relaxed),
            calls_flushed: self.calls_flushed.load(Ordering::Relaxed),
            handshakes_completed: self.handshakes_completed.load(Ordering::Relaxed),
            default_actions: self.default_actions.load(Ordering::Relaxed),
        }
    }
}

impl BusMetrics for CountingMetrics {
    fn record_frame_sent(&self, _func: &str) {
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
    }

    fn record_frame_received(&self, kind: &str) {
        match kind {
            "response" => self.responses_received.fetch_add(1, Ordering::Relaxed),
            _ => self.host_calls_received.fetch_add(1, Ordering::Relaxed),
        };
    }

    fn record_frame_dropped(&self, reason: DropReason) {
        let counter = match reason {
            DropReason::Origin => &self.dropped_origin,
            DropReason::Malformed => &self.dropped_malformed,
            DropReason::Unmatched => &self.dropped_unmatched,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record_call_queued(&self) {
        self.calls_queued.fetch_add(1, Ordering::Relaxed);
    }

    fn record_queue_flushed(&self, count: usize) {
        self.calls_flushed.fetch_add(count as u64, Ordering::Relaxed);
    }

    fn record_handshake_completed(&self) {
        self.handshakes_completed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_default_action(&self, _func: &str) {
        self.default_actions.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub frames_sent: u64,
    pub responses_received: u64,
    pub host_calls_received: u64,
    pub dropped_origin: u64,
    pub dropped_malformed: u64,
    pub dropped_unmatched: u64,
    pub calls_queued: u64,
    pub calls_flushed: u64,
    pub handshakes_completed: u64,
    pub default_actions: u64,
}

impl MetricsSnapshot {
    /// Total inbound frames dropped for any reason.
    pub fn dropped_total(&self) -> u64 {
        self.dropped_origin + self.dropped_malformed + self.dropped_unmatched
    }
}
