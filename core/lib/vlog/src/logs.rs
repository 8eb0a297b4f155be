use std::{backtrace::Backtrace, panic::PanicHookInfo, str::FromStr};

use tracing_subscriber::{fmt, registry::LookupSpan, EnvFilter, Layer};

/// Default directives used if neither the config nor `RUST_LOG` provide any.
const DEFAULT_DIRECTIVES: &str = "zksync=info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Plain => "plain",
            Self::Json => "json",
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported log format `{0}`, expected `plain` or `json`")]
pub struct LogFormatError(String);

impl FromStr for LogFormat {
    type Err = LogFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            _ => Err(LogFormatError(s.to_owned())),
        }
    }
}

/// Logging layer of the observability stack.
#[derive(Debug, Default)]
pub struct Logs {
    format: LogFormat,
    log_directives: Option<String>,
}

impl From<LogFormat> for Logs {
    fn from(format: LogFormat) -> Self {
        Self {
            format,
            log_directives: None,
        }
    }
}

impl Logs {
    pub fn new(format: &str) -> Result<Self, LogFormatError> {
        Ok(Self::from(format.parse::<LogFormat>()?))
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    /// Overrides directives taken from `RUST_LOG`.
    pub fn with_log_directives(mut self, log_directives: Option<String>) -> Self {
        self.log_directives = log_directives;
        self
    }

    pub(crate) fn build_filter(&self) -> anyhow::Result<EnvFilter> {
        let directives = self
            .log_directives
            .clone()
            .or_else(|| std::env::var(EnvFilter::DEFAULT_ENV).ok())
            .unwrap_or_else(|| DEFAULT_DIRECTIVES.to_owned());
        EnvFilter::builder()
            .parse(&directives)
            .map_err(|err| anyhow::anyhow!("invalid log directives `{directives}`: {err}"))
    }

    pub(crate) fn install_panic_hook(&self) {
        // Plain output already gets a readable panic message from the default hook.
        if self.format == LogFormat::Json {
            std::panic::set_hook(Box::new(json_panic_handler));
        }
    }

    pub(crate) fn into_layer<S>(self) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: tracing::Subscriber + for<'span> LookupSpan<'span> + Send + Sync,
    {
        match self.format {
            LogFormat::Plain => fmt::layer().with_target(true).boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(false)
                .boxed(),
        }
    }
}

fn json_panic_handler(panic_info: &PanicHookInfo<'_>) {
    let backtrace = Backtrace::force_capture();
    let location = panic_info
        .location()
        .map(|location| format!("{}:{}", location.file(), location.line()));
    tracing::error!(
        panic.location = location.as_deref(),
        panic.backtrace = %backtrace,
        "{panic_info}"
    );
}
