//! Error handling for MentorBuddy
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for MentorBuddy application
#[derive(Error, Debug)]
pub enum MentorBuddyError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Platform API error: {0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Mentoring platform API specific errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("request timed out")]
    Timeout,

    #[error("rate limited by the platform")]
    RateLimited,

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for MentorBuddy operations
pub type Result<T> = std::result::Result<T, MentorBuddyError>;

/// Result type alias for platform API operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;
