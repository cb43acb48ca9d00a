//! Error taxonomy for list retrieval.

use crate::models::Service;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    /// No matching service/alias/URL, or the user does not exist remotely
    #[error("Invalid user: {0}")]
    InvalidUser(String),

    /// The user exists but has no rated anime
    #[error("No affinity: {0}")]
    NoAffinity(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode {service} response: {source}")]
    Decode {
        service: Service,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FetchError {
    /// True for the errors caused by the user or the remote list itself,
    /// as opposed to transport or decoding failures.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            FetchError::InvalidUser(_) | FetchError::NoAffinity(_) | FetchError::RateLimitExceeded(_)
        )
    }

    pub fn decode(service: Service, source: serde_json::Error) -> Self {
        FetchError::Decode { service, source }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
