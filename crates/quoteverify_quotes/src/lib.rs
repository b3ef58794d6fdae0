// --- File: crates/quoteverify_quotes/src/lib.rs ---

pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_test;
pub mod routes;

// Re-export for main backend
pub use error::VerifyError;
pub use handlers::VerifyState;
pub use logic::{AssociatedEntity, EnrichedQuote};
pub use routes::routes;
