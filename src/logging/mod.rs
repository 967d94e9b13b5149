//! Logging for the SFS client
//!
//! Structured `tracing` output to the console, a rolling log file, or both,
//! as text or JSON.

mod config;

#[cfg(test)]
mod tests;

pub use config::{
    default_log_directory, LogFormat, LogLevel, LogOutput, LoggingConfig, RotationStrategy,
    LOG_FILE_NAME,
};

use std::path::PathBuf;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Logging system errors
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to initialize logging: {0}")]
    InitializationError(String),

    #[error("Failed to create log directory {path}: {reason}")]
    DirectoryCreationError { path: PathBuf, reason: String },

    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
}

pub type LoggingResult<T> = Result<T, LoggingError>;

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Installed logging; dropping it flushes and stops the file writer
pub struct LoggingSystem {
    config: LoggingConfig,
    _guard: Option<WorkerGuard>,
}

impl LoggingSystem {
    /// Install the global subscriber described by `config`.
    ///
    /// `RUST_LOG`, when set, replaces the configured levels.
    pub fn init(config: LoggingConfig) -> LoggingResult<Self> {
        let filter = Self::build_env_filter(&config)?;

        let mut layers: Vec<BoxedLayer<_>> = Vec::new();
        let mut guard = None;

        if matches!(config.output, LogOutput::Console | LogOutput::Both) {
            layers.push(Self::console_layer(&config));
        }
        if config.output.writes_file() {
            let (layer, file_guard) = Self::file_layer(&config)?;
            layers.push(layer);
            guard = Some(file_guard);
        }

        tracing_subscriber::registry()
            .with(filter)
            .with(layers)
            .try_init()
            .map_err(|e| LoggingError::InitializationError(e.to_string()))?;

        tracing::debug!(
            level = %config.level,
            output = ?config.output,
            format = ?config.format,
            "Logging initialized"
        );

        Ok(Self {
            config,
            _guard: guard,
        })
    }

    fn build_env_filter(config: &LoggingConfig) -> LoggingResult<EnvFilter> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(config.filter_directives())
            .map_err(|e| LoggingError::InvalidFilter(e.to_string()))
    }

    fn console_layer<S>(config: &LoggingConfig) -> BoxedLayer<S>
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.include_target)
            .with_thread_ids(config.include_thread_id)
            .with_file(config.include_file_info)
            .with_line_number(config.include_file_info);

        match config.format {
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Text => layer.boxed(),
        }
    }

    fn file_layer<S>(config: &LoggingConfig) -> LoggingResult<(BoxedLayer<S>, WorkerGuard)>
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        let log_dir = config.resolved_log_directory();
        std::fs::create_dir_all(&log_dir).map_err(|e| LoggingError::DirectoryCreationError {
            path: log_dir.clone(),
            reason: e.to_string(),
        })?;

        let rotation = match config.rotation {
            RotationStrategy::Daily => Rotation::DAILY,
            RotationStrategy::Hourly => Rotation::HOURLY,
            RotationStrategy::Never => Rotation::NEVER,
        };
        let appender = RollingFileAppender::new(rotation, &log_dir, LOG_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let layer = fmt::layer()
            .with_writer(writer)
            .with_target(config.include_target)
            .with_thread_ids(config.include_thread_id)
            .with_file(config.include_file_info)
            .with_line_number(config.include_file_info)
            .with_ansi(false);

        let layer = match config.format {
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Text => layer.boxed(),
        };
        Ok((layer, guard))
    }

    /// Directory of the log file, if file output is on
    pub fn log_directory(&self) -> Option<PathBuf> {
        self.config
            .output
            .writes_file()
            .then(|| self.config.resolved_log_directory())
    }

    pub fn log_level(&self) -> LogLevel {
        self.config.level
    }
}
