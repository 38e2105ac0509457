//! Transport limits for the gateway.

use std::time::Duration;

use auth::http::{self as layers, HttpLimits};
use axum::Router;
use axum::http::StatusCode;

pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// The timeout spans every upstream attempt of a proxied request, retries included. Running
/// out of it is the upstream's fault, hence 504.
const LIMITS: HttpLimits = HttpLimits {
    body_limit_bytes: BODY_LIMIT_BYTES,
    timeout: Duration::from_secs(60),
    timeout_status: StatusCode::GATEWAY_TIMEOUT,
};

pub fn apply(router: Router) -> Router {
    layers::apply(router, LIMITS)
}
