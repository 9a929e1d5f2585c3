// src/error.rs

//! Unified error handling for the vacancy pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for vacancy operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client failed before a response was received
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSV reading/writing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet writing failed
    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Upstream request failed or returned a non-2xx status
    #[error("Transport failure for {url}: {message}")]
    Transport { url: String, message: String },

    /// Upstream answered with something that is not a vacancy page
    #[error("Malformed upstream payload: {0}")]
    MalformedPayload(String),

    /// Backing store exists but cannot be decoded
    #[error("Store {location} is unreadable: {message}")]
    StoreUnreadable { location: String, message: String },

    /// Backing store could not be replaced
    #[error("Store {location} is unwritable: {message}")]
    StoreUnwritable { location: String, message: String },

    /// A vacancy was compared with a value of another type
    #[error("Cannot compare a vacancy with {found}")]
    UnsupportedComparison { found: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a transport error for a request target.
    pub fn transport(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a malformed payload error.
    pub fn malformed(message: impl fmt::Display) -> Self {
        Self::MalformedPayload(message.to_string())
    }

    /// Create an unreadable store error.
    pub fn unreadable(location: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::StoreUnreadable {
            location: location.into(),
            message: message.to_string(),
        }
    }

    /// Create an unwritable store error.
    pub fn unwritable(location: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::StoreUnwritable {
            location: location.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the error came from talking to the upstream API.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::MalformedPayload(_) | Self::Http(_)
        )
    }
}
