/*
 * Responsibility
 * - public surface of the transport-level middleware
 */
pub mod http;
