//! Error types

use std::path::PathBuf;

use formguard::{ConfigError, FormError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid submission: {0}")]
    Submission(#[from] serde_json::Error),

    #[error("invalid rule table: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("failed to initialize logging: {0}")]
    Logger(#[from] log::SetLoggerError),
}
