//! Shared setup for the behavioral suite.

use bridge_bus::testing::MockPlatform;
use bridge_bus::{Bus, BusConfig, CountingMetrics, ResponseCallback};
use bridge_client::BridgeClient;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// A client over a fresh mock host window.
pub struct Harness {
    pub platform: Arc<MockPlatform>,
    pub client: BridgeClient,
    pub metrics: Arc<CountingMetrics>,
}

impl Harness {
    /// Embedded in the default parent window.
    pub fn new() -> Self {
        Self::with(MockPlatform::new(), BusConfig::default())
    }

    /// Custom platform and configuration.
    pub fn with(platform: Arc<MockPlatform>, config: BusConfig) -> Self {
        let metrics = Arc::new(CountingMetrics::new());
        let bus = Bus::with_metrics(platform.clone(), config, metrics.clone())
            .unwrap_or_else(|e| panic!("invalid test config: {e}"));
        Self {
            platform,
            client: BridgeClient::new(bus),
            metrics,
        }
    }

    /// Initialized and answered with `frame_context`.
    pub fn ready(frame_context: &str) -> Self {
        let harness = Self::new();
        harness
            .platform
            .initialize_with_context(harness.bus(), frame_context, None);
        harness
    }

    pub fn bus(&self) -> &Bus {
        self.client.bus()
    }

    /// Funcs of every recorded frame, in send order.
    pub fn sent_funcs(&self) -> Vec<String> {
        self.platform
            .messages()
            .into_iter()
            .map(|m| m.func)
            .collect()
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Callback that appends its arguments to a shared log.
pub fn recorder() -> (Arc<Mutex<Vec<Vec<Value>>>>, impl Fn() -> ResponseCallback) {
    let log: Arc<Mutex<Vec<Vec<Value>>>> = Arc::default();
    let sink = log.clone();
    let make = move || -> ResponseCallback {
        let sink = sink.clone();
        Box::new(move |args: &[Value]| sink.lock().push(args.to_vec()))
    };
    (log, make)
}
