/*
 * Responsibility
 * - SQLx access to the users table
 * - implements auth::CredentialStore over a PgPool
 */
use async_trait::async_trait;
use auth::{Credential, CredentialStore, NewCredential, StoreError};
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
struct CredentialRow {
    email: String,
    password: String,
    name: Option<String>,
}

impl From<CredentialRow> for Credential {
    fn from(row: CredentialRow) -> Self {
        Credential {
            email: row.email,
            password_hash: row.password,
            name: row.name,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, StoreError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT email, password, name
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row.map(Credential::from))
    }

    async fn insert(&self, credential: NewCredential) -> Result<Credential, StoreError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            INSERT INTO users (email, password, name)
            VALUES ($1, $2, $3)
            RETURNING email, password, name
            "#,
        )
        .bind(&credential.email)
        .bind(&credential.password_hash)
        .bind(credential.name.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row.into())
    }
}
