//! # Bridge Telemetry
//!
//! Observability for the bridge bus.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` registry with an `EnvFilter` and a
//!   pretty or JSON layer
//! - **Metrics**: Prometheus counters implementing [`bridge_bus::BusMetrics`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bridge_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let telemetry = init_telemetry(TelemetryConfig::from_env())?;
//! let bus = Bus::with_metrics(platform, BusConfig::from_env(), telemetry.metrics())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `frame-bridge` | Service name in log records |
//! | `BRIDGE_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` also honored) |
//! | `BRIDGE_JSON_LOGS` | `false` | Emit JSON log lines |
//! | `BRIDGE_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

mod config;
mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, encode_registry, register_metrics, PrometheusBusMetrics, REGISTRY,
};
pub use tracing_setup::{env_filter, init_tracing};

use std::sync::Arc;
use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Initialize logging and register the bus counters.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    tracing_setup::init_tracing(&config)?;

    Ok(TelemetryGuard { config, metrics })
}

/// Handle returned by [`init_telemetry`].
pub struct TelemetryGuard {
    config: TelemetryConfig,
    metrics: Arc<PrometheusBusMetrics>,
}

impl TelemetryGuard {
    /// Metrics sink to hand to `Bus::with_metrics`.
    pub fn metrics(&self) -> Arc<PrometheusBusMetrics> {
        self.metrics.clone()
    }

    /// Configuration telemetry was started with.
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.config.service_name, "Shutting down telemetry...");
    }
}
