use std::fs::OpenOptions;

use env_logger::{Builder, Target};

use crate::infrastructure::config::LoggingConfig;

#[derive(Debug)]
pub enum LoggingError {
    FileError(String),
    AlreadyInitialized(String),
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggingError::FileError(msg) => write!(f, "Cannot open log file: {}", msg),
            LoggingError::AlreadyInitialized(msg) => {
                write!(f, "Logger already initialized: {}", msg)
            }
        }
    }
}

impl std::error::Error for LoggingError {}

/// Routes `tracing` events (via its `log` feature) into `env_logger`.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let mut builder = Builder::new();
    builder.parse_filters(&config.filter);

    if let Some(path) = &config.file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| LoggingError::FileError(format!("{}: {}", path.display(), e)))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))
}
