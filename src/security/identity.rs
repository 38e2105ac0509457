//! Identity pipeline for requests arriving from inside the trusted network.
//!
//! Two stages run in order:
//! 1. `bearer_stage`: a valid access token in `Authorization` establishes the identity.
//!    Anything wrong with the token is ignored here; the request just continues.
//! 2. `trusted_header_stage`: when nothing established an identity yet, the gateway's
//!    identity header is taken at face value. No signature or expiry check happens.
//!
//! Stage 2 is only sound while this service is unreachable except through the gateway,
//! which strips client copies of the header and sets it itself after verifying the token.

use auth::{Claims, IDENTITY_HEADER, TokenValidator, extract_bearer};
use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::{self, Next},
    response::Response,
};
use tracing::debug;

use crate::security::SecurityContext;
use crate::state::AppState;

/// Attach both identity stages to `router`.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // The last layer added runs first.
    router
        .layer(middleware::from_fn(trusted_header_stage))
        .layer(middleware::from_fn_with_state(state, bearer_stage))
}

async fn bearer_stage(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if req.extensions().get::<SecurityContext>().is_none()
        && let Some(identity) = bearer_identity(&state.validator, &req)
    {
        req.extensions_mut().insert(SecurityContext::new(identity));
    }

    next.run(req).await
}

fn bearer_identity(validator: &TokenValidator, req: &Request) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = extract_bearer(value)?;

    match validator.validate(token) {
        Ok(claims) if usable_as_access(&claims) => Some(claims.subject),
        Ok(_) => {
            debug!(path = %req.uri().path(), "bearer token is not an access token");
            None
        }
        Err(e) => {
            debug!(error = e.kind(), path = %req.uri().path(), "ignoring invalid bearer token");
            None
        }
    }
}

fn usable_as_access(claims: &Claims) -> bool {
    !claims.is_refresh() && claims.has_subject()
}

async fn trusted_header_stage(mut req: Request, next: Next) -> Response {
    if req.extensions().get::<SecurityContext>().is_none()
        && let Some(identity) = header_identity(req.headers())
    {
        req.extensions_mut().insert(SecurityContext::new(identity));
    }

    next.run(req).await
}

// The gateway copies the token subject verbatim, so non-ASCII emails arrive as raw UTF-8.
fn header_identity(headers: &HeaderMap) -> Option<String> {
    let value = std::str::from_utf8(headers.get(IDENTITY_HEADER)?.as_bytes())
        .ok()?
        .trim();
    (!value.is_empty()).then(|| value.to_string())
}
