use thiserror::Error;

use crate::jwt::JwtError;

/// Rejection reasons for a presented session token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No session token provided")]
    Unauthenticated,

    #[error("Session token is invalid: {0}")]
    InvalidToken(String),

    #[error("Session token has expired")]
    ExpiredToken,
}

impl SessionError {
    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::Unauthenticated => "unauthenticated",
            SessionError::InvalidToken(_) => "invalid_token",
            SessionError::ExpiredToken => "expired_token",
        }
    }
}

impl From<JwtError> for SessionError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::ExpiredToken => SessionError::ExpiredToken,
            other => SessionError::InvalidToken(other.to_string()),
        }
    }
}

/// Invalid session timing configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Session ttl must be at least one second, got {0}s")]
    NonPositiveTtl(i64),

    #[error("Renewal window must not be negative, got {0}s")]
    NegativeRenewalWindow(i64),

    #[error("Renewal window ({window}s) must be shorter than the session ttl ({ttl}s)")]
    WindowNotShorterThanTtl { window: i64, ttl: i64 },

    #[error("Maximum session lifetime ({max}s) must be at least the session ttl ({ttl}s)")]
    LifetimeShorterThanTtl { max: i64, ttl: i64 },

    #[error("Session setting {setting} is out of range: {value}")]
    OutOfRange { setting: &'static str, value: i64 },
}
