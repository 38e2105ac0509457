//! Forwarding of routed requests to the user service.
//!
//! Bodies are buffered in both directions. That keeps retries byte-identical and lets the
//! request body limit apply before anything is sent upstream.

use std::time::{Duration, Instant};

use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::Response,
};
use reqwest::Url;
use tracing::{error, info, warn};

use crate::error::AppError;
use crate::middleware::edge_auth::covers;
use crate::middleware::http::BODY_LIMIT_BYTES;
use crate::state::AppState;

const HOP_BY_HOP: [header::HeaderName; 9] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::HOST,
    header::CONTENT_LENGTH,
];

pub struct Proxy {
    client: reqwest::Client,
    upstream: Url,
    route_prefixes: Vec<String>,
    retries: u32,
}

impl Proxy {
    pub fn new(
        upstream: Url,
        route_prefixes: Vec<String>,
        retries: u32,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()?;
        let route_prefixes = route_prefixes
            .into_iter()
            .map(|p| p.trim_end_matches('/').to_string())
            .collect();

        Ok(Self {
            client,
            upstream,
            route_prefixes,
            retries,
        })
    }

    pub fn routes(&self, path: &str) -> bool {
        self.route_prefixes.iter().any(|prefix| covers(prefix, path))
    }

    fn target(&self, uri: &Uri) -> Url {
        let mut url = self.upstream.clone();
        let base = self.upstream.path().trim_end_matches('/');
        url.set_path(&format!("{base}{}", uri.path()));
        url.set_query(uri.query());
        url
    }

    pub async fn forward(&self, req: Request) -> Result<Response, AppError> {
        let started = Instant::now();
        let (parts, body) = req.into_parts();
        let path = parts.uri.path().to_owned();

        if !self.routes(&path) {
            return Err(AppError::NotFound);
        }

        let body = to_bytes(body, BODY_LIMIT_BYTES)
            .await
            .map_err(|_| AppError::BadRequest("request body could not be read"))?;
        let headers = forwardable(&parts.headers);
        let url = self.target(&parts.uri);
        let attempts = if is_retryable(&parts.method) {
            self.retries + 1
        } else {
            1
        };

        let mut attempt = 0;
        let upstream = loop {
            attempt += 1;
            let result = self
                .client
                .request(parts.method.clone(), url.clone())
                .headers(headers.clone())
                .body(body.clone())
                .send()
                .await;

            match result {
                Ok(res) if res.status() == StatusCode::INTERNAL_SERVER_ERROR && attempt < attempts => {
                    warn!(attempt, path = %path, "upstream answered 500, retrying");
                }
                Ok(res) => break res,
                Err(e) if attempt < attempts => {
                    warn!(attempt, error = %e, path = %path, "upstream request failed, retrying");
                }
                Err(e) => {
                    error!(attempt, error = %e, path = %path, "upstream unreachable");
                    return Err(AppError::BadGateway);
                }
            }
        };

        let status = upstream.status();
        let response_headers = forwardable(upstream.headers());
        let bytes = upstream.bytes().await.map_err(|e| {
            error!(error = %e, path = %path, "failed to read upstream response");
            AppError::BadGateway
        })?;

        info!(
            method = %parts.method,
            path = %path,
            status = status.as_u16(),
            attempts = attempt,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "proxied request"
        );

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = response_headers;
        Ok(response)
    }
}

/// Fallback handler: every request that reaches it is a proxy candidate.
pub async fn forward(State(state): State<AppState>, req: Request) -> Result<Response, AppError> {
    state.proxy.forward(req).await
}

fn is_retryable(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD)
}

fn forwardable(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();
    for name in &HOP_BY_HOP {
        headers.remove(name);
    }
    headers.remove("keep-alive");
    headers
}
