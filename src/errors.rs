//! Unified application error type.
//! All modules (remote, store, db, cli, utils) return AppError to keep the
//! error handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Remote record store
    // ---------------------------
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed record: {0}")]
    Malformed(String),

    #[error("No identity remembered: run `login <password>` first")]
    NotSignedIn,

    // ---------------------------
    // IO / local storage
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Serialization
    // ---------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

/// Coarse classification used by callers that only care about the family
/// of a failure, not the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Invalid,
    Transport,
    Local,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::Invalid(_) => ErrorKind::Invalid,
            AppError::Transport(_) | AppError::Malformed(_) | AppError::Json(_) => {
                ErrorKind::Transport
            }
            _ => ErrorKind::Local,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
