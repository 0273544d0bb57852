use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::credential::errors::StoreError;
use crate::credential::models::Credential;
use crate::credential::models::CredentialId;
use crate::credential::models::Identifier;
use crate::credential::ports::CredentialStore;

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    identifier: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CredentialRow> for Credential {
    type Error = StoreError;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        let identifier = Identifier::new(&row.identifier).map_err(|e| {
            StoreError::Unavailable(format!("stored identifier is invalid: {}", e))
        })?;

        Ok(Credential {
            id: CredentialId(row.id),
            identifier,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<Credential>, StoreError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, identifier, password_hash, created_at
            FROM credentials
            WHERE identifier = $1
            "#,
        )
        .bind(identifier.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Credential lookup failed");
            StoreError::Unavailable(e.to_string())
        })?;

        row.map(Credential::try_from).transpose()
    }

    async fn insert(&self, credential: Credential) -> Result<Credential, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO credentials (id, identifier, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(credential.id.0)
        .bind(credential.identifier.as_str())
        .bind(&credential.password_hash)
        .bind(credential.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return StoreError::DuplicateKey(credential.identifier.to_string());
                }
            }
            tracing::error!(error = %e, "Credential insert failed");
            StoreError::Unavailable(e.to_string())
        })?;

        Ok(credential)
    }
}
