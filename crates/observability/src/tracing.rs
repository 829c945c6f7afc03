//! Subscriber installation for runner and paginator events.
//!
//! Filtering follows `RUST_LOG`. The output format is picked with
//! `NSTOR_LOG_FORMAT` (`json`, the default, or `compact`).

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::TestWriter;
use tracing_subscriber::fmt::time::SystemTime;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Filter used when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_FILTER: &str = "info";

/// Environment variable selecting the output format.
pub const FORMAT_ENV: &str = "NSTOR_LOG_FORMAT";

/// Line format of the installed subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event, fields flattened by the formatter.
    #[default]
    Json,
    /// Single human-readable line per event.
    Compact,
}

impl LogFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// What [`install`] sets up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub filter: String,
    pub format: LogFormat,
    /// Write through libtest's capture instead of stdout.
    pub capture: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::default(),
            capture: false,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with a custom variable source. Unknown formats
    /// fall back to JSON; nothing can be logged about it yet.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            filter: lookup(EnvFilter::DEFAULT_ENV).unwrap_or(defaults.filter),
            format: lookup(FORMAT_ENV)
                .and_then(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.format),
            capture: defaults.capture,
        }
    }

    pub fn with_capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize tracing/logging for the process from the environment.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    install(&LogConfig::from_env());
}

/// Install a global subscriber for `config`.
///
/// Returns false if one was already installed; the first one wins.
pub fn install(config: &LogConfig) -> bool {
    let writer = if config.capture {
        BoxMakeWriter::new(TestWriter::new())
    } else {
        BoxMakeWriter::new(std::io::stdout)
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_timer(SystemTime)
        .with_thread_names(true)
        .with_writer(writer);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
    installed.is_ok()
}
