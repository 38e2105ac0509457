pub mod claims;
pub mod codec;
pub mod issuer;
pub mod key;
pub mod validator;

pub use claims::{Claims, TokenType};
pub use codec::{DecodeError, EncodeError};
pub use issuer::TokenIssuer;
pub use key::SigningKey;
pub use validator::{TokenValidator, ValidationError};
