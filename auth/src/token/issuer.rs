use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::claims::{Claims, TokenType};
use super::codec::{self, EncodeError};
use super::key::SigningKey;

/// Mints access and refresh tokens for a subject.
///
/// Refresh tokens are not rotated: minting a new access token never touches the
/// refresh token it was derived from.
#[derive(Clone, Debug)]
pub struct TokenIssuer {
    key: Arc<SigningKey>,
}

impl TokenIssuer {
    pub fn new(key: Arc<SigningKey>) -> Self {
        Self { key }
    }

    pub fn issue_access_token(&self, subject: &str) -> Result<String, EncodeError> {
        self.issue_access_token_at(subject, Utc::now())
    }

    pub fn issue_access_token_at(
        &self,
        subject: &str,
        now: DateTime<Utc>,
    ) -> Result<String, EncodeError> {
        self.issue(subject, TokenType::Access, self.key.access_ttl_seconds(), now)
    }

    pub fn issue_refresh_token(&self, subject: &str) -> Result<String, EncodeError> {
        self.issue_refresh_token_at(subject, Utc::now())
    }

    pub fn issue_refresh_token_at(
        &self,
        subject: &str,
        now: DateTime<Utc>,
    ) -> Result<String, EncodeError> {
        self.issue(subject, TokenType::Refresh, self.key.refresh_ttl_seconds(), now)
    }

    fn issue(
        &self,
        subject: &str,
        token_type: TokenType,
        ttl_seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<String, EncodeError> {
        let issued_at = now.timestamp();
        let claims = Claims {
            subject: subject.to_string(),
            issuer: self.key.issuer().to_string(),
            issued_at,
            expiration: issued_at + ttl_seconds,
            token_type: Some(token_type),
        };

        debug!(token_type = ?token_type, ttl_seconds, "issuing token");
        codec::encode(&claims, &self.key)
    }
}
