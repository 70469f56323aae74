use std::io;

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that end the program.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to open log file: {0}")]
    Log(#[source] io::Error),
}
