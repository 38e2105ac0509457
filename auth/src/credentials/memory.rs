use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::store::{Credential, CredentialStore, NewCredential, StoreError};

/// Process-local store for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    by_email: RwLock<HashMap<String, Credential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, StoreError> {
        let map = self.by_email.read().map_err(poisoned)?;
        Ok(map.get(email).cloned())
    }

    async fn insert(&self, credential: NewCredential) -> Result<Credential, StoreError> {
        let mut map = self.by_email.write().map_err(poisoned)?;
        if map.contains_key(&credential.email) {
            return Err(StoreError::Duplicate);
        }

        let stored = Credential {
            email: credential.email,
            password_hash: credential.password_hash,
            name: credential.name,
        };
        map.insert(stored.email.clone(), stored.clone());
        Ok(stored)
    }
}
