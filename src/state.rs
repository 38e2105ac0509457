/*
 * Responsibility
 * - shared context attached to the Router (AppState)
 * - cheap to Clone (everything behind Arc or already Clone-cheap)
 */
use std::sync::Arc;

use auth::{
    CredentialAuthenticator, CredentialStore, PasswordHasher, RefreshCoordinator, SigningKey,
    TokenIssuer, TokenValidator,
};

#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<CredentialAuthenticator>,
    pub refresh: RefreshCoordinator,
    pub validator: TokenValidator,
    pub credentials: Arc<dyn CredentialStore>,
}

impl AppState {
    /// Wire every auth service around one signing key and one credential store.
    pub fn new(
        signing_key: Arc<SigningKey>,
        credentials: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> auth::AuthResult<Self> {
        let issuer = TokenIssuer::new(signing_key.clone());
        let validator = TokenValidator::new(signing_key);
        let authenticator =
            CredentialAuthenticator::new(credentials.clone(), hasher, issuer.clone())?;

        Ok(Self {
            authenticator: Arc::new(authenticator),
            refresh: RefreshCoordinator::new(validator.clone(), issuer),
            validator,
            credentials,
        })
    }
}
