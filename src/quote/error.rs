//! Quote fetch errors

use thiserror::Error;

/// Why a poll produced no update
///
/// Every variant is non-fatal to the polling loop.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport or connection failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body is not valid JSON
    #[error("Response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Expected time series missing, not an object, or empty.
    /// Provider rate-limit answers land here too.
    #[error("Invalid data format or API limit reached: missing {key}{}", notice_suffix(.notice))]
    InvalidFormat {
        key: String,
        notice: Option<String>,
    },
}

fn notice_suffix(notice: &Option<String>) -> String {
    match notice {
        Some(n) => format!(" ({})", n),
        None => String::new(),
    }
}

impl FetchError {
    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Status { .. } => "status",
            FetchError::Parse(_) => "parse",
            FetchError::InvalidFormat { .. } => "invalid_format",
        }
    }

    /// Whether the provider notice reads like a rate-limit message
    pub fn is_rate_limited(&self) -> bool {
        match self {
            FetchError::InvalidFormat {
                notice: Some(notice),
                ..
            } => {
                let lower = notice.to_lowercase();
                lower.contains("rate limit")
                    || lower.contains("call frequency")
                    || lower.contains("requests per")
            }
            FetchError::Status { status, .. } => *status == 429,
            _ => false,
        }
    }
}
