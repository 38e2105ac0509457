use std::sync::Arc;
use std::time::Duration as StdDuration;

use auth::token::codec::{self, DecodeError};
use auth::{SigningKey, TokenIssuer, TokenValidator, ValidationError};
use chrono::{Duration, TimeZone, Utc};

const SECRET: &[u8] = b"integration-secret-0123456789abcdef";

fn tokens(issuer: &str, access_ttl: u64, refresh_ttl: u64) -> (TokenIssuer, TokenValidator) {
    let key = Arc::new(SigningKey::new(SECRET, issuer, access_ttl, refresh_ttl).unwrap());
    (TokenIssuer::new(key.clone()), TokenValidator::new(key))
}

fn replace_char(s: &str, index: usize) -> String {
    s.char_indices()
        .map(|(i, c)| {
            if i != index {
                c
            } else if c == 'A' {
                'B'
            } else {
                'A'
            }
        })
        .collect()
}

#[test]
fn subject_survives_issue_and_validate() {
    let (issuer, validator) = tokens("user-service", 900, 86_400);
    for subject in ["a@b.com", "UPPER@case.org", "ü@例え.jp", "with space@x.io", "\"quoted\"@x"] {
        let token = issuer.issue_access_token(subject).unwrap();
        assert_eq!(validator.validate(&token).unwrap().subject, subject);
    }
}

#[test]
fn fifteen_minute_token_validates_immediately() {
    let (issuer, validator) = tokens("user-service", 15 * 60, 86_400);
    let token = issuer.issue_access_token("a@b.com").unwrap();

    let claims = validator.validate(&token).unwrap();
    assert_eq!(claims.subject, "a@b.com");
    assert!(validator.is_valid(&token));
}

#[test]
fn expiry_is_monotonic_in_time() {
    let ttl = 300;
    let (issuer, validator) = tokens("user-service", ttl, 86_400);
    let issued = Utc.with_ymd_and_hms(2026, 7, 4, 10, 0, 0).unwrap();
    let token = issuer.issue_access_token_at("a@b.com", issued).unwrap();

    for offset in [0, 1, 150, ttl as i64 - 1] {
        assert!(
            validator
                .validate_at(&token, issued + Duration::seconds(offset))
                .is_ok(),
            "offset {offset}"
        );
    }
    for offset in [ttl as i64, ttl as i64 + 1, 86_400] {
        assert_eq!(
            validator.validate_at(&token, issued + Duration::seconds(offset)),
            Err(ValidationError::Expired),
            "offset {offset}"
        );
    }
}

#[tokio::test]
async fn one_second_token_expires_after_two_seconds() {
    let (issuer, validator) = tokens("user-service", 1, 2);
    let token = issuer.issue_access_token("a@b.com").unwrap();

    tokio::time::sleep(StdDuration::from_secs(2)).await;

    assert_eq!(validator.validate(&token), Err(ValidationError::Expired));
    assert!(!validator.is_valid(&token));
}

#[test]
fn foreign_secret_is_signature_mismatch() {
    let (issuer, _) = tokens("user-service", 900, 86_400);
    let token = issuer.issue_access_token("a@b.com").unwrap();

    let other = SigningKey::new(b"a-completely-different-secret-value!", "user-service", 900, 86_400)
        .unwrap();
    assert_eq!(codec::decode(&token, &other), Err(DecodeError::SignatureMismatch));
    assert_eq!(
        TokenValidator::new(Arc::new(other)).validate(&token),
        Err(ValidationError::SignatureMismatch)
    );
}

#[test]
fn any_signature_edit_is_detected() {
    let (issuer, validator) = tokens("user-service", 900, 86_400);
    let token = issuer.issue_access_token("a@b.com").unwrap();
    let signature_start = token.rfind('.').unwrap() + 1;

    for index in signature_start..token.len() {
        let tampered = replace_char(&token, index);
        assert_eq!(
            validator.validate(&tampered),
            Err(ValidationError::SignatureMismatch),
            "index {index}"
        );
    }
}

#[test]
fn any_payload_edit_is_rejected() {
    let (issuer, validator) = tokens("user-service", 900, 86_400);
    let token = issuer.issue_access_token("a@b.com").unwrap();
    let payload_start = token.find('.').unwrap() + 1;
    let payload_end = token.rfind('.').unwrap();

    for index in payload_start..payload_end {
        let tampered = replace_char(&token, index);
        let result = validator.validate(&tampered);
        assert!(
            matches!(
                result,
                Err(ValidationError::SignatureMismatch) | Err(ValidationError::Malformed)
            ),
            "index {index}: {result:?}"
        );
    }
}

#[test]
fn other_issuer_is_isolated() {
    let (foreign, _) = tokens("billing-service", 900, 86_400);
    let (_, validator) = tokens("user-service", 900, 86_400);
    let token = foreign.issue_access_token("a@b.com").unwrap();

    assert_eq!(validator.validate(&token), Err(ValidationError::IssuerMismatch));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_validation_agrees() {
    let (issuer, validator) = tokens("user-service", 900, 86_400);
    let token = Arc::new(issuer.issue_access_token("a@b.com").unwrap());
    let expected = validator.validate(&token).unwrap();

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let validator = validator.clone();
            let token = token.clone();
            tokio::spawn(async move { validator.validate(&token) })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), Ok(expected.clone()));
    }
}
