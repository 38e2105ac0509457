use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

/// Identity established for one request.
///
/// Stored in that request's extensions only, so it is dropped with the request and can
/// never be observed by another one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityContext {
    pub identity: String,
    pub authorities: Vec<String>,
}

impl SecurityContext {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            authorities: Vec::new(),
        }
    }
}

/// Handler-side access to the [`SecurityContext`]; 401 when no stage established one.
pub struct SecurityContextExtractor(pub SecurityContext);

impl<S> FromRequestParts<S> for SecurityContextExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .cloned()
            .map(SecurityContextExtractor)
            .ok_or(AppError::Unauthorized("authentication required"))
    }
}
