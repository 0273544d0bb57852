use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::credential::errors::StoreError;
use crate::credential::models::Credential;
use crate::credential::models::Identifier;
use crate::credential::ports::CredentialStore;

/// Process-local credential store.
///
/// Insert checks and writes under one lock, so it enforces uniqueness the
/// same way a database unique index does.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    credentials: Mutex<HashMap<Identifier, Credential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Identifier, Credential>> {
        self.credentials.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<Credential>, StoreError> {
        Ok(self.lock().get(identifier).cloned())
    }

    async fn insert(&self, credential: Credential) -> Result<Credential, StoreError> {
        let mut credentials = self.lock();

        if credentials.contains_key(&credential.identifier) {
            return Err(StoreError::DuplicateKey(credential.identifier.to_string()));
        }

        credentials.insert(credential.identifier.clone(), credential.clone());
        Ok(credential)
    }
}
