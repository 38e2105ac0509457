//! Compact HS256 token encoding and signature-only decoding.
//!
//! `decode` answers one question: was this token produced under our secret? Issuer and
//! expiry are policy and live in [`TokenValidator`](super::TokenValidator).

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, Header, Validation};
use thiserror::Error;

use super::claims::Claims;
use super::key::SigningKey;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed token")]
    Malformed,
    #[error("token signature mismatch")]
    SignatureMismatch,
}

/// Signing failed. Not reachable with an HMAC key and a derived claim set, but the
/// underlying library reports it, so callers get a value instead of a panic.
#[derive(Debug, Error)]
#[error("failed to sign token: {0}")]
pub struct EncodeError(#[from] jsonwebtoken::errors::Error);

pub fn encode(claims: &Claims, key: &SigningKey) -> Result<String, EncodeError> {
    let header = Header::new(ALGORITHM);
    Ok(jsonwebtoken::encode(&header, claims, key.encoding_key())?)
}

pub fn decode(token: &str, key: &SigningKey) -> Result<Claims, DecodeError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [_, _, signature] = segments.as_slice() else {
        return Err(DecodeError::Malformed);
    };
    if segments.iter().any(|s| s.is_empty()) {
        return Err(DecodeError::Malformed);
    }

    // A signature segment that is not even base64url cannot be our MAC.
    if URL_SAFE_NO_PAD.decode(signature).is_err() {
        return Err(DecodeError::SignatureMismatch);
    }

    jsonwebtoken::decode::<Claims>(token, key.decoding_key(), &signature_only())
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                DecodeError::SignatureMismatch
            }
            _ => DecodeError::Malformed,
        })
}

fn signature_only() -> Validation {
    let mut validation = Validation::new(ALGORITHM);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation.leeway = 0;
    validation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn key(secret: &str) -> SigningKey {
        SigningKey::new(secret.as_bytes(), "user-service", 900, 86_400).unwrap()
    }

    fn claims() -> Claims {
        Claims {
            subject: "a@b.com".to_string(),
            issuer: "user-service".to_string(),
            issued_at: 1_700_000_000,
            expiration: 1_700_000_900,
            token_type: Some(TokenType::Access),
        }
    }

    #[test]
    fn decodes_what_it_encodes() {
        let k = key("0123456789abcdef0123456789abcdef");
        let token = encode(&claims(), &k).unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(decode(&token, &k).unwrap(), claims());
    }

    #[test]
    fn decode_ignores_expiry_and_issuer() {
        let k = key("0123456789abcdef0123456789abcdef");
        let stale = Claims {
            issuer: "someone-else".to_string(),
            issued_at: 1,
            expiration: 2,
            ..claims()
        };
        let token = encode(&stale, &k).unwrap();
        assert_eq!(decode(&token, &k).unwrap(), stale);
    }

    #[test]
    fn different_secret_is_signature_mismatch() {
        let signer = key("0123456789abcdef0123456789abcdef");
        let verifier = key("fedcba9876543210fedcba9876543210");
        let token = encode(&claims(), &signer).unwrap();
        assert_eq!(decode(&token, &verifier), Err(DecodeError::SignatureMismatch));
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        let k = key("0123456789abcdef0123456789abcdef");
        for token in ["", "abc", "a.b", "a.b.c.d", "a..c", ".b.c", "a.b."] {
            assert_eq!(decode(token, &k), Err(DecodeError::Malformed), "{token:?}");
        }
    }

    #[test]
    fn garbage_header_is_malformed() {
        let k = key("0123456789abcdef0123456789abcdef");
        let token = encode(&claims(), &k).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[0] = "bm90LWpzb24";
        assert_eq!(decode(&parts.join("."), &k), Err(DecodeError::Malformed));
    }

    #[test]
    fn foreign_algorithm_is_signature_mismatch() {
        let k = key("0123456789abcdef0123456789abcdef");
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims(),
            k.encoding_key(),
        )
        .unwrap();
        assert_eq!(decode(&token, &k), Err(DecodeError::SignatureMismatch));
    }
}
