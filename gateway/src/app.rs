/*
 * Responsibility
 * - load Config -> build EdgePolicy / TokenValidator / Proxy -> assemble the Router
 * - apply middleware (edge auth, response headers, HTTP layers)
 * - start with axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use auth::TokenValidator;
use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::middleware::{edge_auth, edge_auth::EdgePolicy, http, response_headers};
use crate::proxy::{self, Proxy};
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,gateway=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        upstream = %config.upstream,
        public_prefixes = ?config.public_prefixes,
        "starting gateway in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_state(config: &Config) -> Result<AppState> {
    let proxy = Proxy::new(
        config.upstream.clone(),
        config.route_prefixes.clone(),
        config.upstream_retries,
        config.upstream_timeout,
    )
    .context("failed to build upstream HTTP client")?;

    Ok(AppState::new(
        EdgePolicy::new(config.public_prefixes.clone()),
        TokenValidator::new(Arc::new(config.signing_key.clone())),
        proxy,
    ))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

pub(crate) fn build_router(state: AppState) -> Router {
    let proxied = edge_auth::apply(Router::new().fallback(proxy::forward), state.clone());

    let router = Router::new()
        .route("/health", get(health))
        .merge(proxied)
        .with_state(state);

    http::apply(response_headers::apply(router))
}
