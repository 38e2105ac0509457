/*
 * Responsibility
 * - shared gateway context (edge policy, token validator, upstream proxy)
 */
use std::sync::Arc;

use auth::TokenValidator;

use crate::middleware::edge_auth::EdgePolicy;
use crate::proxy::Proxy;

#[derive(Clone)]
pub struct AppState {
    pub policy: Arc<EdgePolicy>,
    pub validator: TokenValidator,
    pub proxy: Arc<Proxy>,
}

impl AppState {
    pub fn new(policy: EdgePolicy, validator: TokenValidator, proxy: Proxy) -> Self {
        Self {
            policy: Arc::new(policy),
            validator,
            proxy: Arc::new(proxy),
        }
    }
}
