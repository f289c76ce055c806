use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by lookup operations
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Transport failures from the HTTP client
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Timeout error: call to CWRC timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    // Response received but not 2xx
    #[error("Call to CWRC failed, possibly a network or server problem. HTTP error: {status}")]
    RemoteService { status: u16 },

    #[error("Malformed data in {context}: {message}")]
    MalformedData { context: String, message: String },

    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },
}

impl Error {
    /// HTTP status carried by a remote service failure
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RemoteService { status } => Some(*status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    pub(crate) fn malformed(context: impl Into<String>, message: impl ToString) -> Self {
        Error::MalformedData {
            context: context.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
