//! Transport limits for the user service.

use std::time::Duration;

use auth::http::{self as layers, HttpLimits};
use axum::Router;
use axum::http::StatusCode;

/// Auth payloads are tiny.
const LIMITS: HttpLimits = HttpLimits {
    body_limit_bytes: 64 * 1024,
    timeout: Duration::from_secs(30),
    timeout_status: StatusCode::REQUEST_TIMEOUT,
};

pub fn apply(router: Router) -> Router {
    layers::apply(router, LIMITS)
}
