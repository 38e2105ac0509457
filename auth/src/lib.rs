//! Stateless token authentication shared by the gateway, the user service and the token CLI.
//!
//! Everything here is a pure function of its inputs, the immutable [`SigningKey`] and the
//! clock, except [`CredentialAuthenticator`], which reaches the credential store.

pub mod bearer;
pub mod config;
pub mod credentials;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod services;
pub mod token;

pub use bearer::extract_bearer;
pub use config::ConfigError;
pub use credentials::{
    Argon2PasswordHasher, Credential, CredentialStore, InMemoryCredentialStore, NewCredential,
    PasswordHasher, StoreError,
};
pub use error::{AuthError, AuthResult};
pub use services::{CredentialAuthenticator, RefreshCoordinator, TokenPair, canonical_email};
pub use token::{Claims, SigningKey, TokenIssuer, TokenType, TokenValidator, ValidationError};

/// Trusted identity header set by the gateway and read by internal services.
pub const IDENTITY_HEADER: &str = "x-user-email";
