use thiserror::Error;

/// Error type for token operations.
///
/// `InvalidToken` and `ExpiredToken` are the only two verification outcomes;
/// callers branch on the variant, never on the message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is invalid: {0}")]
    InvalidToken(String),

    #[error("Token is expired")]
    ExpiredToken,

    #[error("Token lifetime must be at least one second, got {0}s")]
    InvalidTtl(i64),

    #[error("Token subject must not be empty")]
    EmptySubject,
}
