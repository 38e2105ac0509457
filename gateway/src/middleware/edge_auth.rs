//! Bearer token check at the gateway boundary.
//!
//! Every request loses any client-supplied identity header first. Then:
//! - paths with `.` or `..` segments are answered `400`,
//! - public paths pass through untouched,
//! - everything else needs `Authorization: Bearer <access token>`; on success the
//!   verified subject is written to the identity header for the services behind us,
//!   otherwise the request is answered `401` here and never forwarded.

use auth::{IDENTITY_HEADER, TokenValidator, ValidationError, extract_bearer};
use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::state::AppState;

/// Path prefixes that skip authentication.
#[derive(Debug, Clone)]
pub struct EdgePolicy {
    public_prefixes: Vec<String>,
}

impl EdgePolicy {
    pub fn new(public_prefixes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let public_prefixes = public_prefixes
            .into_iter()
            .map(|p| p.into().trim_end_matches('/').to_string())
            .collect();
        Self { public_prefixes }
    }

    /// A prefix covers the exact path and anything below it, on segment boundaries:
    /// `/api/v1/auth` covers `/api/v1/auth/login` but not `/api/v1/authority`.
    pub fn is_public(&self, path: &str) -> bool {
        self.public_prefixes
            .iter()
            .any(|prefix| covers(prefix, path))
    }
}

pub(crate) fn covers(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.is_empty(),
        None => false,
    }
}

/// True when any path segment is `.` or `..`, spelled raw or percent-encoded.
///
/// The upstream URL builder resolves such segments, so a path that looks public here
/// could land on a protected route behind us.
pub(crate) fn has_dot_segment(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeDecision {
    /// The path is rejected before any policy applies.
    BadPath,
    Bypass,
    Forward { identity: String },
    Reject(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingBearer,
    InvalidToken(ValidationError),
    RefreshTokenAsBearer,
    EmptySubject,
}

impl RejectReason {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingBearer => "missing_bearer",
            Self::InvalidToken(e) => e.kind(),
            Self::RefreshTokenAsBearer => "refresh_token_as_bearer",
            Self::EmptySubject => "empty_subject",
        }
    }
}

/// Decide what happens to a request. Pure apart from reading the clock for expiry.
pub fn evaluate(
    policy: &EdgePolicy,
    validator: &TokenValidator,
    path: &str,
    headers: &HeaderMap,
) -> EdgeDecision {
    if has_dot_segment(path) {
        return EdgeDecision::BadPath;
    }
    if policy.is_public(path) {
        return EdgeDecision::Bypass;
    }

    let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer)
    else {
        return EdgeDecision::Reject(RejectReason::MissingBearer);
    };

    let claims = match validator.validate(token) {
        Ok(claims) => claims,
        Err(e) => return EdgeDecision::Reject(RejectReason::InvalidToken(e)),
    };

    if claims.is_refresh() {
        return EdgeDecision::Reject(RejectReason::RefreshTokenAsBearer);
    }
    if !claims.has_subject() {
        return EdgeDecision::Reject(RejectReason::EmptySubject);
    }

    EdgeDecision::Forward {
        identity: claims.subject,
    }
}

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, edge_auth))
}

async fn edge_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if req.headers_mut().remove(IDENTITY_HEADER).is_some() {
        debug!(path = %req.uri().path(), "dropped client-supplied identity header");
    }

    let decision = evaluate(&state.policy, &state.validator, req.uri().path(), req.headers());

    match decision {
        EdgeDecision::BadPath => {
            warn!(path = %req.uri().path(), "rejected dot segment in path");
            AppError::BadRequest("path must not contain dot segments").into_response()
        }
        EdgeDecision::Bypass => next.run(req).await,
        EdgeDecision::Forward { identity } => match HeaderValue::from_str(&identity) {
            Ok(value) => {
                req.headers_mut().insert(IDENTITY_HEADER, value);
                next.run(req).await
            }
            Err(_) => {
                warn!(path = %req.uri().path(), "subject cannot be carried in a header");
                AppError::Unauthorized.into_response()
            }
        },
        EdgeDecision::Reject(reason) => {
            warn!(error = reason.kind(), path = %req.uri().path(), "rejected at edge");
            AppError::Unauthorized.into_response()
        }
    }
}
