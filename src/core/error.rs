//! Typed errors surfaced by the rate core

use thiserror::Error;

/// Failure of either upstream endpoint.
///
/// Carried into the application state as a value, never raised across the
/// core/front-end boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Request error: {0}")]
    Transport(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("HTTP error: {status} for {url}")]
    Status { status: u16, url: String },
    #[error("Failed to parse response from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("No exchange-rate table found at {0}")]
    EmptyTable(String),
    #[error("Invalid rate data: {0}")]
    InvalidData(String),
    #[error("Fetch ended without a result: {0}")]
    TaskFailed(String),
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport(_) | FetchError::Timeout(_) => true,
            FetchError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else if err.is_decode() {
            FetchError::Decode {
                url: err
                    .url()
                    .map_or_else(|| "<unknown>".to_string(), |u| u.to_string()),
                reason: err.to_string(),
            }
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateError {
    #[error("Currency code must not be empty")]
    EmptyCode,
    #[error("Invalid mid rate {mid} for {code}")]
    InvalidMid { code: String, mid: f64 },
}
