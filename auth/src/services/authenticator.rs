use std::sync::Arc;

use tracing::{debug, error, info};

use crate::credentials::{Credential, CredentialStore, NewCredential, PasswordHasher};
use crate::error::{AuthError, AuthResult};
use crate::token::TokenIssuer;

/// Access token plus the refresh token it can be renewed with.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenPair { .. }")
    }
}

/// Emails are compared and used as token subjects in this form.
pub fn canonical_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Password login and registration, both ending in a freshly issued token pair.
pub struct CredentialAuthenticator {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: TokenIssuer,
    // Verified against when the email is unknown so both rejection paths do the same work.
    decoy_hash: String,
}

impl CredentialAuthenticator {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        issuer: TokenIssuer,
    ) -> AuthResult<Self> {
        let decoy_hash = hasher.hash("decoy-password-never-matches")?;
        Ok(Self {
            store,
            hasher,
            issuer,
            decoy_hash,
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthResult<TokenPair> {
        let email = canonical_email(email);

        let Some(credential) = self.store.find_by_email(&email).await.map_err(|e| {
            error!(error = %e, "credential lookup failed");
            AuthError::from(e)
        })?
        else {
            let _ = self.verify(password, &self.decoy_hash).await;
            debug!("login rejected: unknown email");
            return Err(AuthError::AuthenticationFailed);
        };

        let matches = self
            .verify(password, &credential.password_hash)
            .await
            .inspect_err(|e| error!(error = %e, "stored password hash is unusable"))?;
        if !matches {
            debug!("login rejected: password mismatch");
            return Err(AuthError::AuthenticationFailed);
        }

        self.issue_pair(&credential)
    }

    /// Stores a new credential and logs it in straight away.
    pub async fn register_and_login(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> AuthResult<TokenPair> {
        let new = NewCredential {
            email: canonical_email(email),
            password_hash: self.hash(password).await?,
            name: name.map(str::to_string),
        };

        let stored = self.store.insert(new).await.map_err(|e| {
            let e = AuthError::from(e);
            if matches!(e, AuthError::Internal(_)) {
                error!(error = %e, "credential insert failed");
            }
            e
        })?;
        info!("credential registered");

        self.login(&stored.email, password).await
    }

    // Argon2 takes tens of milliseconds of CPU, so it runs on the blocking pool.
    async fn verify(&self, password: &str, password_hash: &str) -> AuthResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        let (password, password_hash) = (password.to_owned(), password_hash.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash))
            .await
            .map_err(|e| AuthError::Internal(format!("password task failed: {e}")))?
            .map_err(AuthError::from)
    }

    async fn hash(&self, password: &str) -> AuthResult<String> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("password task failed: {e}")))?
            .map_err(AuthError::from)
    }

    fn issue_pair(&self, credential: &Credential) -> AuthResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.issuer.issue_access_token(&credential.email)?,
            refresh_token: self.issuer.issue_refresh_token(&credential.email)?,
        })
    }
}
