use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// A stored login credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Canonical (trimmed, lower-cased) email; doubles as the token subject.
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

/// Insert payload. The hash is produced before it reaches the store.
#[derive(Clone)]
pub struct NewCredential {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("credential already exists")]
    Duplicate,
    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] when the email is already taken.
    async fn insert(&self, credential: NewCredential) -> Result<Credential, StoreError>;
}
