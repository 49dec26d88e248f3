//! Error types for the Mastermind crate

use thiserror::Error;

/// Main error type for the Mastermind crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid code: {reason}")]
    InvalidCode { reason: String },

    #[error("invalid action: {reason}")]
    InvalidAction { reason: String },

    #[error("the environment is not reset")]
    NotReset,

    #[error("state has no value table row (call policy on it before update): {state}")]
    UnknownState { state: String },

    #[error("action {action} is not in the action space")]
    UnknownAction { action: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}
