//! Error handling and custom error types
//!
//! Provides unified error handling across the service using thiserror. Every
//! variant falls into one of three client-facing categories, see
//! [`ErrorCategory`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed caller input. The message is shown to the client.
    #[error("{0}")]
    ClientInput(String),

    /// The remote model API answered with a non-success status.
    #[error("OpenAI API error (status {status})")]
    Upstream {
        status: u16,
        details: serde_json::Value,
    },

    #[error("{0}")]
    Internal(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Client-facing classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    ClientInput,
    Upstream,
    Internal,
}

impl Error {
    pub fn client_input(reason: impl Into<String>) -> Self {
        Self::ClientInput(reason.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ClientInput(_) => ErrorCategory::ClientInput,
            Self::Upstream { .. } => ErrorCategory::Upstream,
            _ => ErrorCategory::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
