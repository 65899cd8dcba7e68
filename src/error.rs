//! Error types shared across the crate.
//!
//! Each layer gets its own enum so callers can decide how to recover:
//! authentication failures send the user back to the consent screen, facade
//! failures are folded into a `FetchResult::Error`, and generation failures
//! become an error string in place of the insight text.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid server address {value:?}: {reason}")]
    InvalidAddress { value: String, reason: String },

    #[error("invalid URL {value:?}: {reason}")]
    InvalidUrl { value: String, reason: String },
}

/// Failures while turning an authorization code into credentials.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("no login is in progress for this session")]
    NotAwaitingCallback,

    #[error("state parameter does not match the pending login")]
    StateMismatch,

    #[error("authorization was denied: {0}")]
    Denied(String),

    #[error("token endpoint rejected the code ({status}): {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed token response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("token endpoint rejected the refresh ({status}): {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("refresh request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed token response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not logged in to Spotify, please re-authenticate")]
    NotAuthenticated,

    #[error("session expired ({0}), please re-authenticate")]
    Refresh(#[from] RefreshError),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to Spotify failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Spotify returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("unexpected response from Spotify: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to Gemini failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gemini returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected response from Gemini: {0}")]
    Decode(String),

    #[error("Gemini returned no text")]
    Empty,
}
