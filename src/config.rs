/*
 * Responsibility
 * - load environment variables (PORT, DATABASE_URL, signing key, ...)
 * - validate them (missing or invalid values abort startup)
 */
use std::net::SocketAddr;

use auth::config::{self as cfg, ConfigError};
use auth::SigningKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        match lookup("APP_ENV")
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    /// `None` only in development, where the in-memory store stands in.
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    pub signing_key: SigningKey,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = cfg::optional_parsed(&lookup, "PORT", 8081)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::from_lookup(&lookup);

        let database_url = match cfg::required(&lookup, "DATABASE_URL") {
            Ok(url) => Some(url),
            Err(e) if app_env.is_production() => return Err(e),
            Err(_) => None,
        };
        let database_max_connections = cfg::optional_parsed(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?;

        let signing_key = SigningKey::from_lookup(&lookup)?;

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            signing_key,
        })
    }
}
