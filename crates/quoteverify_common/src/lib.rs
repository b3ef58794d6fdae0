// --- File: crates/quoteverify_common/src/lib.rs ---

pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{
    config_error, external_service_error, internal_error, missing_parameter, not_found,
    HttpStatusCode, QuoteVerifyError,
};

// Re-export HTTP utilities for easier access
pub use http::{client::create_client, IntoHttpResponse};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level, log_error};

pub use services::{
    AssociationKind, BoxFuture, BoxedCrmService, BoxedError, CrmRecord, CrmService, QuoteRecord,
};
