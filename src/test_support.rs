use std::sync::{Arc, LazyLock};

use auth::{
    Argon2PasswordHasher, InMemoryCredentialStore, SigningKey, TokenIssuer, TokenValidator,
};
use axum::{body::to_bytes, response::Response};

use crate::state::AppState;

static SIGNING_KEY: LazyLock<Arc<SigningKey>> = LazyLock::new(|| {
    Arc::new(
        SigningKey::new(b"test-secret-0123456789abcdef012345", "user-service", 900, 604_800)
            .expect("test signing key"),
    )
});

pub fn signing_key() -> Arc<SigningKey> {
    SIGNING_KEY.clone()
}

pub fn issuer() -> TokenIssuer {
    TokenIssuer::new(signing_key())
}

pub fn validator() -> TokenValidator {
    TokenValidator::new(signing_key())
}

/// Fresh in-memory state sharing the test signing key.
pub fn test_state() -> AppState {
    AppState::new(
        signing_key(),
        Arc::new(InMemoryCredentialStore::new()),
        Arc::new(Argon2PasswordHasher::new()),
    )
    .expect("test state")
}

pub async fn body_string(res: Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(res: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(res).await).unwrap()
}
