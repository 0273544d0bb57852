use std::sync::Arc;

use async_trait::async_trait;
use auth::IssuedToken;
use auth::PasswordError;
use auth::PasswordHasher;
use auth::TokenCodec;
use chrono::Duration;

use crate::credential::errors::AuthError;
use crate::credential::models::Credential;
use crate::credential::models::CredentialId;
use crate::credential::models::LoginCommand;
use crate::credential::models::Password;
use crate::credential::models::RegisterCommand;
use crate::credential::ports::AuthServicePort;
use crate::credential::ports::CredentialStore;

/// Domain service implementation for registration and login.
///
/// Holds no per-user state; every call is independent apart from the store.
/// Argon2 work runs on the blocking pool so it never stalls the async workers.
pub struct AuthService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    password_hasher: PasswordHasher,
    token_codec: Arc<TokenCodec>,
    session_ttl: Duration,
}

impl<CS> AuthService<CS>
where
    CS: CredentialStore,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `password_hasher` - Configured Argon2 hasher
    /// * `token_codec` - Session token signer
    /// * `session_ttl` - Lifetime of tokens issued at login
    pub fn new(
        store: Arc<CS>,
        password_hasher: PasswordHasher,
        token_codec: Arc<TokenCodec>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            store,
            password_hasher,
            token_codec,
            session_ttl,
        }
    }

    async fn hash_password(&self, password: Password) -> Result<String, AuthError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || hasher.hash(password.expose()))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    async fn verify_password(
        &self,
        password: Password,
        password_hash: String,
    ) -> Result<bool, AuthError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || hasher.verify(password.expose(), &password_hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| match e {
                PasswordError::MalformedHash(reason) => AuthError::CorruptCredential(reason),
                other => AuthError::Hashing(other.to_string()),
            })
    }

    async fn spend_equivalent_work(&self, password: Password) {
        let hasher = self.password_hasher.clone();

        let _ = tokio::task::spawn_blocking(move || {
            hasher.spend_equivalent_work(password.expose())
        })
        .await;
    }
}

#[async_trait]
impl<CS> AuthServicePort for AuthService<CS>
where
    CS: CredentialStore,
{
    async fn register(&self, command: RegisterCommand) -> Result<Credential, AuthError> {
        let RegisterCommand {
            identifier,
            password,
        } = command;

        // Fast path only; the store's unique constraint settles concurrent registrations.
        if self.store.find_by_identifier(&identifier).await?.is_some() {
            return Err(AuthError::AlreadyExists(identifier.to_string()));
        }

        let password_hash = self.hash_password(password).await?;

        let credential = Credential {
            id: CredentialId::new(),
            identifier,
            password_hash,
            created_at: self.token_codec.now(),
        };

        let created = self.store.insert(credential).await?;

        tracing::info!(credential_id = %created.id, "Credential registered");

        Ok(created)
    }

    async fn login(&self, command: LoginCommand) -> Result<IssuedToken, AuthError> {
        let LoginCommand {
            identifier,
            password,
        } = command;

        let credential = match self.store.find_by_identifier(&identifier).await? {
            Some(credential) => credential,
            None => {
                self.spend_equivalent_work(password).await;
                return Err(AuthError::NotFound(identifier.to_string()));
            }
        };

        let matches = self
            .verify_password(password, credential.password_hash.clone())
            .await
            .inspect_err(|e| {
                tracing::error!(credential_id = %credential.id, error = %e, "Password verification failed");
            })?;

        if !matches {
            tracing::debug!(credential_id = %credential.id, "Login rejected");
            return Err(AuthError::WrongPassword);
        }

        let issued = self
            .token_codec
            .issue(&credential.id.to_string(), self.session_ttl)?;

        tracing::info!(
            credential_id = %credential.id,
            expires_at = %issued.expires_at(),
            "Session issued"
        );

        Ok(issued)
    }
}
