/*
 * Responsibility
 * - GET /users/me for whoever the identity pipeline established
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::dto::users::UserResponse,
    error::AppError,
    security::SecurityContextExtractor,
    state::AppState,
};

pub async fn me(
    State(state): State<AppState>,
    SecurityContextExtractor(ctx): SecurityContextExtractor,
) -> Result<Json<UserResponse>, AppError> {
    let credential = state
        .credentials
        .find_by_email(&auth::canonical_email(&ctx.identity))
        .await
        .map_err(auth::AuthError::from)?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(credential.into()))
}
