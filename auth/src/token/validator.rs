use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::claims::Claims;
use super::codec::{self, DecodeError};
use super::key::SigningKey;

/// Why a presented token was not accepted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("malformed token")]
    Malformed,
    #[error("token signature mismatch")]
    SignatureMismatch,
    #[error("token issuer mismatch")]
    IssuerMismatch,
    #[error("token expired")]
    Expired,
}

impl ValidationError {
    /// Stable short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::SignatureMismatch => "signature_mismatch",
            Self::IssuerMismatch => "issuer_mismatch",
            Self::Expired => "expired",
        }
    }
}

impl From<DecodeError> for ValidationError {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::Malformed => Self::Malformed,
            DecodeError::SignatureMismatch => Self::SignatureMismatch,
        }
    }
}

/// Signature + issuer + expiry verification.
///
/// Holds nothing but the immutable key, so a single instance (or any number of clones)
/// can serve concurrent requests.
#[derive(Clone, Debug)]
pub struct TokenValidator {
    key: Arc<SigningKey>,
}

impl TokenValidator {
    pub fn new(key: Arc<SigningKey>) -> Self {
        Self { key }
    }

    pub fn validate(&self, token: &str) -> Result<Claims, ValidationError> {
        self.validate_at(token, Utc::now())
    }

    /// A token is accepted only while `now < exp`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, ValidationError> {
        let claims = codec::decode(token, &self.key)?;

        if claims.issuer != self.key.issuer() {
            return Err(ValidationError::IssuerMismatch);
        }
        if claims.expiration <= now.timestamp() {
            return Err(ValidationError::Expired);
        }

        Ok(claims)
    }

    pub fn is_valid(&self, token: &str) -> bool {
        !token.trim().is_empty() && self.validate(token).is_ok()
    }
}
