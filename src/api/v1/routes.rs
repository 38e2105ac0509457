/*
 * Responsibility
 * - v1 URL layout
 * - /auth/{..} (public) and /users/{..} (identity required, enforced by the extractor)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{auth as auth_handlers, users};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth_handlers::login))
        .route("/auth/register", post(auth_handlers::register))
        .route("/auth/refresh", post(auth_handlers::refresh))
        .route("/users/me", get(users::me))
}
