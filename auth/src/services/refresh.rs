use chrono::{DateTime, Utc};
use tracing::{debug, error};

use crate::error::{AuthError, AuthResult};
use crate::services::authenticator::TokenPair;
use crate::token::{TokenIssuer, TokenValidator};

/// Exchanges a refresh token for a new access token.
///
/// Only tokens typed `refresh` are accepted. The refresh token is not rotated: the
/// presented one comes back unchanged and stays usable until it expires.
#[derive(Clone, Debug)]
pub struct RefreshCoordinator {
    validator: TokenValidator,
    issuer: TokenIssuer,
}

impl RefreshCoordinator {
    pub fn new(validator: TokenValidator, issuer: TokenIssuer) -> Self {
        Self { validator, issuer }
    }

    pub fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        self.refresh_at(refresh_token, Utc::now())
    }

    pub fn refresh_at(&self, refresh_token: &str, now: DateTime<Utc>) -> AuthResult<TokenPair> {
        let claims = self.validator.validate_at(refresh_token, now).map_err(|e| {
            debug!(error = e.kind(), "refresh token rejected");
            AuthError::RefreshInvalid
        })?;

        if !claims.is_refresh() {
            debug!(token_type = ?claims.token_type, "refresh attempted with non-refresh token");
            return Err(AuthError::WrongTokenType);
        }
        if !claims.has_subject() {
            debug!("refresh token carries no subject");
            return Err(AuthError::RefreshInvalid);
        }

        let access_token = self
            .issuer
            .issue_access_token_at(&claims.subject, now)
            .map_err(|e| {
                error!(error = %e, "failed to issue access token on refresh");
                AuthError::from(e)
            })?;

        Ok(TokenPair {
            access_token,
            refresh_token: refresh_token.to_string(),
        })
    }
}
