//! Logging infrastructure for BSpec.
//!
//! All log output goes to stderr (and optionally a file) so that rendered
//! command output on stdout stays machine-readable.

use std::io;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Log file path (if file logging enabled).
    pub file_path: Option<PathBuf>,
    /// Include source location.
    pub source_location: bool,
    /// Include the event target.
    pub target: bool,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
            LogLevel::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
            LogLevel::Info => tracing_subscriber::filter::LevelFilter::INFO,
            LogLevel::Warn => tracing_subscriber::filter::LevelFilter::WARN,
            LogLevel::Error => tracing_subscriber::filter::LevelFilter::ERROR,
        }
    }
}

impl LogLevel {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Map a `-v` count onto a level, starting from `warn`.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        match verbose {
            0 if quiet => Self::Error,
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    /// Filter directive for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON structured format.
    Json,
}

impl LogFormat {
    /// Parse from string, falling back to [`LogFormat::Pretty`].
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            file_path: None,
            source_location: false,
            target: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Override fields with any `BSPEC_LOG_*` variables that are set.
    pub fn with_env(mut self) -> Self {
        if let Ok(level) = std::env::var("BSPEC_LOG_LEVEL") {
            if let Some(l) = LogLevel::parse(&level) {
                self.level = l;
            }
        }

        if let Ok(format) = std::env::var("BSPEC_LOG_FORMAT") {
            self.format = LogFormat::parse(&format);
        }

        if let Ok(file_path) = std::env::var("BSPEC_LOG_FILE") {
            self.file_path = Some(PathBuf::from(file_path));
        }

        self
    }

    /// Set the level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Build the filter, letting `RUST_LOG` take precedence.
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
    }
}

/// Initialize logging with the given configuration.
pub fn init(config: LogConfig) -> Result<(), LogError> {
    let registry = tracing_subscriber::registry().with(config.filter());

    let file = match &config.file_path {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            Some(std::sync::Mutex::new(file))
        }
        None => None,
    };

    match config.format {
        LogFormat::Pretty => {
            let stderr_layer = fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(file.is_none())
                .with_target(config.target)
                .with_file(config.source_location)
                .with_line_number(config.source_location);
            let file_layer = file.map(|f| {
                fmt::layer()
                    .with_writer(f)
                    .with_ansi(false)
                    .with_target(true)
            });
            registry
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| LogError::InitError(e.to_string()))?;
        }
        LogFormat::Compact => {
            let stderr_layer = fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_target(config.target);
            let file_layer = file.map(|f| fmt::layer().compact().with_writer(f).with_ansi(false));
            registry
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| LogError::InitError(e.to_string()))?;
        }
        LogFormat::Json => {
            let stderr_layer = fmt::layer().json().with_writer(io::stderr);
            let file_layer = file.map(|f| fmt::layer().json().with_writer(f));
            registry
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
                .map_err(|e| LogError::InitError(e.to_string()))?;
        }
    }

    Ok(())
}

/// Logging errors.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to initialize logging: {0}")]
    InitError(String),

    #[error("failed to open log file: {0}")]
    FileError(#[from] io::Error),
}

/// Convenience macros re-exported from tracing.
pub use tracing::{debug, error, info, trace, warn};
