//! Logging System
//!
//! Structured `tracing` output for hub requests. Every menu and spawn decision
//! is logged with the user and offering as fields, so the hub log alone shows
//! why a user got a given profile or mount.

use crate::error::HubError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub const LOG_FILTER_ENV: &str = "COURSEHUB_LOG";
pub const LOG_FORMAT_ENV: &str = "COURSEHUB_LOG_FORMAT";
pub const LOG_OUTPUT_ENV: &str = "COURSEHUB_LOG_OUTPUT";

/// Logging section of the hub document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output is "file"; defaults to the platform data directory
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Colored text output on terminals
    #[serde(default = "default_true")]
    pub color: bool,

    /// Per-target levels, e.g. `coursehub::mounts: debug`
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(HubError::ConfigError(format!(
                "Invalid log format: {} (must be 'json' or 'text')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    Stdout,
    Stderr,
    File(PathBuf),
}

impl LogDestination {
    fn parse(output: &str, file: Option<&PathBuf>) -> Result<Self, HubError> {
        match output {
            "stdout" => Ok(LogDestination::Stdout),
            "stderr" => Ok(LogDestination::Stderr),
            "file" => Ok(LogDestination::File(
                file.cloned().unwrap_or_else(default_log_file),
            )),
            other => Err(HubError::ConfigError(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', or 'file')",
                other
            ))),
        }
    }

    fn writer(&self) -> Result<BoxMakeWriter, HubError> {
        let path = match self {
            LogDestination::Stdout => return Ok(BoxMakeWriter::new(std::io::stdout)),
            LogDestination::Stderr => return Ok(BoxMakeWriter::new(std::io::stderr)),
            LogDestination::File(path) => path,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                HubError::ConfigError(format!("Failed to create log directory: {}", e))
            })?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                HubError::ConfigError(format!("Failed to open log file {}: {}", path.display(), e))
            })?;
        Ok(BoxMakeWriter::new(Mutex::new(file)))
    }
}

/// `coursehub.log` in the platform data directory, else the working directory
fn default_log_file() -> PathBuf {
    ProjectDirs::from("", "", "coursehub")
        .map(|dirs| dirs.data_local_dir().join("coursehub.log"))
        .unwrap_or_else(|| PathBuf::from("coursehub.log"))
}

/// Logging settings after environment overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLogging {
    pub directives: String,
    pub format: LogFormat,
    pub destination: LogDestination,
    pub ansi: bool,
}

impl LoggingConfig {
    /// Apply `COURSEHUB_LOG*` overrides and validate every value.
    ///
    /// `COURSEHUB_LOG` replaces the level and module directives entirely.
    pub fn resolve(&self) -> Result<ResolvedLogging, HubError> {
        let directives = match std::env::var(LOG_FILTER_ENV) {
            Ok(filter) if !filter.trim().is_empty() => filter,
            _ => self.directives(),
        };
        EnvFilter::try_new(&directives)
            .map_err(|e| HubError::ConfigError(format!("Invalid log directive: {}", e)))?;

        let format = match std::env::var(LOG_FORMAT_ENV) {
            Ok(format) => format.parse()?,
            Err(_) => self.format.parse()?,
        };
        let output = std::env::var(LOG_OUTPUT_ENV).unwrap_or_else(|_| self.output.clone());
        let destination = LogDestination::parse(&output, self.file.as_ref())?;

        let ansi = self.color
            && format == LogFormat::Text
            && !matches!(destination, LogDestination::File(_));
        Ok(ResolvedLogging {
            directives,
            format,
            destination,
            ansi,
        })
    }

    /// Level followed by `target=level` per module; `off` silences everything
    fn directives(&self) -> String {
        if self.level == "off" {
            return "off".to_string();
        }
        let mut parts = vec![self.level.clone()];
        parts.extend(
            self.modules
                .iter()
                .map(|(module, level)| format!("{}={}", module, level)),
        );
        parts.join(",")
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), HubError> {
    let default_config = LoggingConfig::default();
    let resolved = config.unwrap_or(&default_config).resolve()?;
    let filter = EnvFilter::try_new(&resolved.directives)
        .map_err(|e| HubError::ConfigError(format!("Invalid log directive: {}", e)))?;
    let writer = resolved.destination.writer()?;

    let subscriber = Registry::default().with(filter);
    let result = match resolved.format {
        LogFormat::Json => subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Text => subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(resolved.ansi)
                    .with_writer(writer),
            )
            .try_init(),
    };

    result.map_err(|e| HubError::ConfigError(format!("Failed to initialize logging: {}", e)))
}
