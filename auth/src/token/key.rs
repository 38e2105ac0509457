use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::config::{self, ConfigError};

/// HS256 needs at least 256 bits of key material.
pub const MIN_SECRET_BYTES: usize = 32;

pub const SIGNING_KEY_VAR: &str = "AUTH_SIGNING_KEY";
pub const ISSUER_VAR: &str = "AUTH_ISSUER";
pub const ACCESS_TTL_VAR: &str = "ACCESS_TOKEN_TTL_SECONDS";
pub const REFRESH_TTL_VAR: &str = "REFRESH_TOKEN_TTL_SECONDS";

/// Process-wide signing configuration: shared secret, issuer and token lifetimes.
///
/// Built once at startup and handed to [`TokenIssuer`](super::TokenIssuer) and
/// [`TokenValidator`](super::TokenValidator) behind an `Arc`. It is never mutated after
/// construction, so both can be used from any number of tasks without locking.
#[derive(Clone)]
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("SigningKey")
            .field("issuer", &self.issuer)
            .field("access_ttl_seconds", &self.access_ttl_seconds)
            .field("refresh_ttl_seconds", &self.refresh_ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl SigningKey {
    pub fn new(
        secret: &[u8],
        issuer: impl Into<String>,
        access_ttl_seconds: u64,
        refresh_ttl_seconds: u64,
    ) -> Result<Self, ConfigError> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::Invalid(SIGNING_KEY_VAR));
        }

        let issuer = issuer.into();
        if issuer.trim().is_empty() {
            return Err(ConfigError::Invalid(ISSUER_VAR));
        }

        let access_ttl_seconds = positive_seconds(access_ttl_seconds, ACCESS_TTL_VAR)?;
        let refresh_ttl_seconds = positive_seconds(refresh_ttl_seconds, REFRESH_TTL_VAR)?;
        if refresh_ttl_seconds <= access_ttl_seconds {
            return Err(ConfigError::Invalid(REFRESH_TTL_VAR));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer,
            access_ttl_seconds,
            refresh_ttl_seconds,
        })
    }

    /// Load from the process environment. Every variable is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = config::required(&lookup, SIGNING_KEY_VAR)?;
        let issuer = config::required(&lookup, ISSUER_VAR)?;
        let access_ttl = config::required_parsed::<u64>(&lookup, ACCESS_TTL_VAR)?;
        let refresh_ttl = config::required_parsed::<u64>(&lookup, REFRESH_TTL_VAR)?;

        Self::new(secret.as_bytes(), issuer, access_ttl, refresh_ttl)
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_seconds
    }

    pub fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl_seconds
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

fn positive_seconds(value: u64, key: &'static str) -> Result<i64, ConfigError> {
    match i64::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ConfigError::Invalid(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn complete_env() -> Vec<(&'static str, &'static str)> {
        vec![
            (SIGNING_KEY_VAR, SECRET),
            (ISSUER_VAR, "user-service"),
            (ACCESS_TTL_VAR, "900"),
            (REFRESH_TTL_VAR, "604800"),
        ]
    }

    #[test]
    fn loads_complete_configuration() {
        let key = SigningKey::from_lookup(env(&complete_env())).unwrap();
        assert_eq!(key.issuer(), "user-service");
        assert_eq!(key.access_ttl_seconds(), 900);
        assert_eq!(key.refresh_ttl_seconds(), 604_800);
    }

    #[test]
    fn every_variable_is_required() {
        for missing in [SIGNING_KEY_VAR, ISSUER_VAR, ACCESS_TTL_VAR, REFRESH_TTL_VAR] {
            let pairs: Vec<_> = complete_env()
                .into_iter()
                .filter(|(k, _)| *k != missing)
                .collect();
            let err = SigningKey::from_lookup(env(&pairs)).unwrap_err();
            assert_eq!(err, ConfigError::Missing(missing));
        }
    }

    #[test]
    fn short_secret_fails_fast() {
        let err = SigningKey::new(b"too-short", "iss", 60, 120).unwrap_err();
        assert_eq!(err, ConfigError::Invalid(SIGNING_KEY_VAR));
    }

    #[test]
    fn refresh_ttl_must_outlive_access_ttl() {
        let err = SigningKey::new(SECRET.as_bytes(), "iss", 600, 600).unwrap_err();
        assert_eq!(err, ConfigError::Invalid(REFRESH_TTL_VAR));
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let err = SigningKey::new(SECRET.as_bytes(), "iss", 0, 600).unwrap_err();
        assert_eq!(err, ConfigError::Invalid(ACCESS_TTL_VAR));
    }

    #[test]
    fn debug_output_hides_secret() {
        let key = SigningKey::new(SECRET.as_bytes(), "iss", 60, 120).unwrap();
        let printed = format!("{:?}", key);
        assert!(!printed.contains(SECRET));
        assert!(printed.contains("iss"));
    }
}
