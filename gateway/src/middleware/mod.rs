/*
 * Responsibility
 * - public surface of the gateway middleware
 */
pub mod edge_auth;
pub mod http;
pub mod response_headers;
