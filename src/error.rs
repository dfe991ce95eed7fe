use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the TimeGlass API client
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or transport failure (connection refused, DNS, broken body stream)
    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status. Any error body is discarded.
    #[error("HTTP {}: {status_text}", .status.as_u16())]
    Status {
        status: StatusCode,
        status_text: String,
    },

    /// Response body was not the JSON shape we expected
    #[error("Failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// Base URL and endpoint did not form a valid URL
    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    /// The task running the request died before producing a result
    #[error("Request task aborted: {0}")]
    Aborted(String),
}

impl ApiError {
    /// Build a status error from a response status code
    pub fn from_status(status: StatusCode) -> Self {
        Self::Status {
            status,
            status_text: status.canonical_reason().unwrap_or("").to_string(),
        }
    }

    /// HTTP status code, if the backend answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
