//! Headers stamped on every gateway response.
//!
//! `x-gateway-handled` is always set so callers can tell the gateway answered or relayed.
//! The browser-hardening headers are only added when the upstream did not set its own.

use axum::Router;
use axum::http::header::{HeaderName, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

pub const GATEWAY_HANDLED: &str = "x-gateway-handled";

pub fn apply(router: Router) -> Router {
    router
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(GATEWAY_HANDLED),
            HeaderValue::from_static("true"),
        ))
        // Clickjacking protection
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        // Prevent MIME sniffing
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("no-referrer"),
        ))
}
