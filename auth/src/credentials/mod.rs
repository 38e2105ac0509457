pub mod memory;
pub mod password;
pub mod store;

pub use memory::InMemoryCredentialStore;
pub use password::{Argon2PasswordHasher, HashError, PasswordHasher};
pub use store::{Credential, CredentialStore, NewCredential, StoreError};
