pub mod authenticator;
pub mod refresh;

pub use authenticator::{CredentialAuthenticator, TokenPair, canonical_email};
pub use refresh::RefreshCoordinator;
