/*
 * Responsibility
 * - load gateway settings (port, upstream, public/routed prefixes, retries, signing key)
 * - fail startup on anything missing or unparsable
 */
use std::net::SocketAddr;
use std::time::Duration;

use auth::SigningKey;
use auth::config::{self as cfg, ConfigError};
use reqwest::Url;

const DEFAULT_PUBLIC_PREFIXES: &[&str] = &["/api/v1/auth"];
const DEFAULT_ROUTE_PREFIXES: &[&str] = &["/api/v1/auth", "/api/v1/users", "/api/v1/projects"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
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

    pub upstream: Url,
    pub public_prefixes: Vec<String>,
    pub route_prefixes: Vec<String>,
    pub upstream_retries: u32,
    pub upstream_timeout: Duration,

    pub signing_key: SigningKey,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = cfg::optional_parsed(&lookup, "PORT", 8080)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let upstream = Url::parse(cfg::required(&lookup, "USER_SERVICE_URL")?.trim())
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or(ConfigError::Invalid("USER_SERVICE_URL"))?;

        let upstream_timeout_seconds: u64 =
            cfg::optional_parsed(&lookup, "GATEWAY_UPSTREAM_TIMEOUT_SECONDS", 10)?;
        if upstream_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("GATEWAY_UPSTREAM_TIMEOUT_SECONDS"));
        }

        Ok(Self {
            addr,
            app_env: AppEnv::from_lookup(&lookup),
            upstream,
            public_prefixes: cfg::comma_list(
                &lookup,
                "GATEWAY_PUBLIC_PREFIXES",
                DEFAULT_PUBLIC_PREFIXES,
            ),
            route_prefixes: cfg::comma_list(&lookup, "GATEWAY_ROUTE_PREFIXES", DEFAULT_ROUTE_PREFIXES),
            upstream_retries: cfg::optional_parsed(&lookup, "GATEWAY_UPSTREAM_RETRIES", 3)?,
            upstream_timeout: Duration::from_secs(upstream_timeout_seconds),
            signing_key: SigningKey::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn base() -> Vec<(&'static str, &'static str)> {
        vec![
            ("AUTH_SIGNING_KEY", "0123456789abcdef0123456789abcdef"),
            ("AUTH_ISSUER", "user-service"),
            ("ACCESS_TOKEN_TTL_SECONDS", "900"),
            ("REFRESH_TOKEN_TTL_SECONDS", "604800"),
            ("USER_SERVICE_URL", "http://user-service:8081"),
        ]
    }

    #[test]
    fn defaults_follow_the_route_table() {
        let config = Config::from_lookup(lookup(&base())).unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.public_prefixes, vec!["/api/v1/auth"]);
        assert_eq!(
            config.route_prefixes,
            vec!["/api/v1/auth", "/api/v1/users", "/api/v1/projects"]
        );
        assert_eq!(config.upstream_retries, 3);
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
        assert_eq!(config.upstream.as_str(), "http://user-service:8081/");
    }

    #[test]
    fn upstream_is_required_and_must_be_http() {
        let without: Vec<_> = base()
            .into_iter()
            .filter(|(k, _)| *k != "USER_SERVICE_URL")
            .collect();
        assert_eq!(
            Config::from_lookup(lookup(&without)).unwrap_err(),
            ConfigError::Missing("USER_SERVICE_URL")
        );

        let mut ftp = without.clone();
        ftp.push(("USER_SERVICE_URL", "ftp://files"));
        assert_eq!(
            Config::from_lookup(lookup(&ftp)).unwrap_err(),
            ConfigError::Invalid("USER_SERVICE_URL")
        );
    }

    #[test]
    fn prefixes_are_configurable() {
        let mut pairs = base();
        pairs.push(("GATEWAY_PUBLIC_PREFIXES", "/api/v1/auth, /public ,"));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.public_prefixes, vec!["/api/v1/auth", "/public"]);
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let mut pairs = base();
        pairs.push(("GATEWAY_UPSTREAM_TIMEOUT_SECONDS", "0"));
        assert_eq!(
            Config::from_lookup(lookup(&pairs)).unwrap_err(),
            ConfigError::Invalid("GATEWAY_UPSTREAM_TIMEOUT_SECONDS")
        );
    }
}
