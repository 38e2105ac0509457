use serde::{Deserialize, Serialize};

/// Which half of a token pair a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claim set carried by every token.
///
/// Serialized with the registered JWT claim names. Timestamps are whole seconds since the
/// Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "sub")]
    pub subject: String,
    #[serde(rename = "iss")]
    pub issuer: String,
    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "exp")]
    pub expiration: i64,
    #[serde(rename = "typ", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,
}

impl Claims {
    pub fn is_refresh(&self) -> bool {
        self.token_type == Some(TokenType::Refresh)
    }

    /// An empty (or whitespace-only) subject never identifies anyone.
    pub fn has_subject(&self) -> bool {
        !self.subject.trim().is_empty()
    }
}
