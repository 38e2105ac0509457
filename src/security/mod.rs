/*!
 * Request identity
 *
 * Responsibility:
 * - SecurityContext: who the current request acts for (request-scoped, lives in extensions)
 * - identity pipeline: bearer stage, then trusted-header stage
 */

mod context;
pub mod identity;

pub use context::{SecurityContext, SecurityContextExtractor};
