use thiserror::Error;

/// Error for CredentialId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Identifier validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Email must not be empty")]
    Empty,

    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Input rejected before any store access
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0}")]
    Identifier(#[from] IdentifierError),

    #[error("Password must not be empty")]
    EmptyPassword,
}

/// Failures reported by a credential store
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Credential already exists: {0}")]
    DuplicateKey(String),

    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}

/// Top-level error for registration and login
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Email already registered: {0}")]
    AlreadyExists(String),

    #[error("No credential for: {0}")]
    NotFound(String),

    #[error("Wrong password")]
    WrongPassword,

    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    // Infrastructure errors
    #[error("Stored credential is corrupt: {0}")]
    CorruptCredential(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token issuance failed: {0}")]
    TokenIssue(String),
}

impl AuthError {
    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "validation_error",
            AuthError::AlreadyExists(_) => "already_exists",
            AuthError::NotFound(_) => "not_found",
            AuthError::WrongPassword => "wrong_password",
            AuthError::StoreUnavailable(_) => "store_unavailable",
            AuthError::CorruptCredential(_)
            | AuthError::Hashing(_)
            | AuthError::TokenIssue(_) => "internal_error",
        }
    }
}

impl From<IdentifierError> for AuthError {
    fn from(err: IdentifierError) -> Self {
        AuthError::Validation(ValidationError::Identifier(err))
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(identifier) => AuthError::AlreadyExists(identifier),
            StoreError::Unavailable(reason) => AuthError::StoreUnavailable(reason),
        }
    }
}

impl From<auth::JwtError> for AuthError {
    fn from(err: auth::JwtError) -> Self {
        AuthError::TokenIssue(err.to_string())
    }
}
