//! Construction-time error types.
//!
//! Calls against the Bot API never return these: transport and decode
//! failures degrade to "no data" (see [`crate::dispatcher`]).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotApiError {
    #[error("bot token must not be empty")]
    EmptyToken,

    #[error("invalid proxy configuration: {0}")]
    InvalidProxy(String),

    #[error("invalid API base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("HTTP client build error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Convenience Result alias.
pub type BotApiResult<T> = Result<T, BotApiError>;
