use async_trait::async_trait;

use crate::credential::errors::AuthError;
use crate::credential::errors::StoreError;
use crate::credential::models::Credential;
use crate::credential::models::Identifier;
use crate::credential::models::LoginCommand;
use crate::credential::models::RegisterCommand;

/// Port for registration and login operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new credential.
    ///
    /// # Arguments
    /// * `command` - Validated identifier and password
    ///
    /// # Returns
    /// Created credential
    ///
    /// # Errors
    /// * `AlreadyExists` - Identifier is already registered
    /// * `StoreUnavailable` - Store operation failed
    /// * `Hashing` - Password hashing failed
    async fn register(&self, command: RegisterCommand) -> Result<Credential, AuthError>;

    /// Verify a password and issue a session token.
    ///
    /// # Arguments
    /// * `command` - Validated identifier and password
    ///
    /// # Returns
    /// Signed token bound to the credential id, with its claims
    ///
    /// # Errors
    /// * `NotFound` - No credential for the identifier
    /// * `WrongPassword` - Password does not match
    /// * `CorruptCredential` - Stored hash cannot be parsed
    /// * `StoreUnavailable` - Store operation failed
    /// * `TokenIssue` - Token signing failed
    async fn login(&self, command: LoginCommand) -> Result<auth::IssuedToken, AuthError>;
}

/// Persistence operations for credentials.
///
/// The store's own uniqueness constraint on `identifier` is authoritative:
/// `insert` must fail with `DuplicateKey` even when a prior lookup found nothing.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve credential by normalized identifier.
    ///
    /// # Returns
    /// Optional credential (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Store operation failed
    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<Credential>, StoreError>;

    /// Persist new credential.
    ///
    /// # Returns
    /// Stored credential
    ///
    /// # Errors
    /// * `DuplicateKey` - Identifier is already taken
    /// * `Unavailable` - Store operation failed
    async fn insert(&self, credential: Credential) -> Result<Credential, StoreError>;
}
