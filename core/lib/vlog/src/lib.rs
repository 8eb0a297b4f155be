//! This crate contains the observability subsystem.
//! It is responsible for providing a centralized interface for consistent observability configuration.

use anyhow::Context as _;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use crate::logs::{LogFormat, LogFormatError, Logs};

pub mod logs;

/// Builder for the observability subsystem.
/// Currently capable of configuring logging output.
#[derive(Debug, Default)]
pub struct ObservabilityBuilder {
    logs: Option<Logs>,
}

/// Guard for the observability subsystem. Logs the shutdown upon being dropped.
#[derive(Debug)]
pub struct ObservabilityGuard {
    format: LogFormat,
}

impl ObservabilityGuard {
    pub fn log_format(&self) -> LogFormat {
        self.format
    }
}

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        tracing::debug!("observability stack is shut down");
    }
}

impl ObservabilityBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logs(mut self, logs: Option<Logs>) -> Self {
        self.logs = logs;
        self
    }

    /// Tries to initialize the observability subsystem. Returns an error if it's already initialized
    /// or if log directives cannot be parsed. This is mostly useful in tests.
    pub fn try_build(self) -> anyhow::Result<ObservabilityGuard> {
        let logs = self.logs.unwrap_or_default();
        let format = logs.format();
        let global_filter = logs.build_filter()?;
        logs.install_panic_hook();

        tracing_subscriber::registry()
            .with(global_filter)
            .with(logs.into_layer())
            .try_init()
            .context("failed installing global tracer / logger")?;
        tracing::debug!(%format, "installed observability stack");
        Ok(ObservabilityGuard { format })
    }
}
