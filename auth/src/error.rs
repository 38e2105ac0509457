use thiserror::Error;

use crate::credentials::{HashError, StoreError};
use crate::token::EncodeError;

/// Outcome of the login, registration and refresh flows.
///
/// Details carried by `Internal` are for logs only and must not reach a client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid email or password")]
    AuthenticationFailed,

    #[error("credential already exists")]
    DuplicateCredential,

    #[error("invalid refresh token")]
    RefreshInvalid,

    #[error("token is not a refresh token")]
    WrongTokenType,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => AuthError::DuplicateCredential,
            StoreError::Unavailable(detail) => AuthError::Internal(detail),
        }
    }
}

impl From<HashError> for AuthError {
    fn from(e: HashError) -> Self {
        AuthError::Internal(e.to_string())
    }
}

impl From<EncodeError> for AuthError {
    fn from(e: EncodeError) -> Self {
        AuthError::Internal(e.to_string())
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
