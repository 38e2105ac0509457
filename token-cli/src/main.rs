use std::{error::Error, sync::Arc};

use auth::{SigningKey, TokenIssuer, TokenValidator};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

/// Issue or inspect tokens signed with the key from the environment.
///
/// Reads AUTH_SIGNING_KEY, AUTH_ISSUER, ACCESS_TOKEN_TTL_SECONDS and
/// REFRESH_TOKEN_TTL_SECONDS (a `.env` file is honoured), exactly like the services.
#[derive(Parser, Debug)]
#[command(name = "token-cli", version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a freshly signed token for SUBJECT
    Issue {
        /// Subject (canonical email) to put in `sub`
        #[arg(long)]
        subject: String,

        /// Issue a refresh token instead of an access token
        #[arg(long, default_value_t = false)]
        refresh: bool,

        /// Override iat (unix seconds). Default: now.
        #[arg(long)]
        iat: Option<i64>,
    },
    /// Validate TOKEN and print its claims as JSON
    Inspect { token: String },
}

fn run(command: Command, key: Arc<SigningKey>) -> Result<String, Box<dyn Error>> {
    match command {
        Command::Issue {
            subject,
            refresh,
            iat,
        } => {
            let now = match iat {
                Some(secs) => DateTime::<Utc>::from_timestamp(secs, 0).ok_or("iat out of range")?,
                None => Utc::now(),
            };
            let issuer = TokenIssuer::new(key);
            let token = if refresh {
                issuer.issue_refresh_token_at(&subject, now)?
            } else {
                issuer.issue_access_token_at(&subject, now)?
            };
            Ok(token)
        }
        Command::Inspect { token } => match TokenValidator::new(key).validate(token.trim()) {
            Ok(claims) => Ok(serde_json::to_string_pretty(&claims)?),
            Err(e) => Err(format!("invalid token: {}", e.kind()).into()),
        },
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    let key = Arc::new(SigningKey::from_env()?);

    println!("{}", run(args.command, key)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> Arc<SigningKey> {
        Arc::new(
            SigningKey::new(b"cli-test-secret-0123456789abcdefgh", "user-service", 900, 86_400)
                .unwrap(),
        )
    }

    fn parse(argv: &[&str]) -> Command {
        Args::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn issue_requires_subject() {
        assert!(Args::try_parse_from(["token-cli", "issue"]).is_err());
        assert!(Args::try_parse_from(["token-cli"]).is_err());
    }

    #[test]
    fn issued_access_token_inspects_back() {
        let token = run(parse(&["token-cli", "issue", "--subject", "a@b.com"]), key()).unwrap();
        let shown = run(parse(&["token-cli", "inspect", &token]), key()).unwrap();

        let claims: serde_json::Value = serde_json::from_str(&shown).unwrap();
        assert_eq!(claims["sub"], "a@b.com");
        assert_eq!(claims["typ"], "access");
    }

    #[test]
    fn refresh_flag_issues_refresh_token() {
        let token = run(
            parse(&["token-cli", "issue", "--subject", "a@b.com", "--refresh"]),
            key(),
        )
        .unwrap();
        let claims = TokenValidator::new(key()).validate(&token).unwrap();
        assert!(claims.is_refresh());
    }

    #[test]
    fn inspect_reports_error_kind() {
        let stale = run(
            parse(&["token-cli", "issue", "--subject", "a@b.com", "--iat", "1000"]),
            key(),
        )
        .unwrap();

        let err = run(parse(&["token-cli", "inspect", &stale]), key()).unwrap_err();
        assert_eq!(err.to_string(), "invalid token: expired");

        let err = run(parse(&["token-cli", "inspect", "nope"]), key()).unwrap_err();
        assert_eq!(err.to_string(), "invalid token: malformed");
    }
}
