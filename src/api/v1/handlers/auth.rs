/*
 * Responsibility
 * - POST /auth/login, /auth/register, /auth/refresh
 * - JSON in, DTO validation, delegate to the auth services, JSON out
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    api::v1::dto::auth::{LoginRequest, RefreshRequest, RegisterRequest, TokenResponse},
    error::AppError,
    state::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(req) = payload?;
    req.validate()
        .map_err(|m| AppError::bad_request("INVALID_PAYLOAD", m))?;

    let pair = state.authenticator.login(&req.email, &req.password).await?;
    Ok(Json(pair.into()))
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let Json(req) = payload?;
    req.validate()
        .map_err(|m| AppError::bad_request("INVALID_PAYLOAD", m))?;

    let pair = state
        .authenticator
        .register_and_login(&req.email, &req.password, req.name.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(pair.into())))
}

pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(req) = payload?;
    req.validate()
        .map_err(|m| AppError::bad_request("INVALID_PAYLOAD", m))?;

    let pair = state.refresh.refresh(req.refresh_token.trim())?;
    Ok(Json(pair.into()))
}
