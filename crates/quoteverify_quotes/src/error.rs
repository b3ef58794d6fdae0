// --- File: crates/quoteverify_quotes/src/error.rs ---
use quoteverify_common::{
    config_error, external_service_error, internal_error, missing_parameter, not_found,
    BoxedError, HttpStatusCode, QuoteVerifyError,
};
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, warn};

/// Failures of a quote verification request.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// `quoteId` absent or empty
    #[error("Missing required query parameter 'quoteId'")]
    MissingParameter,

    /// The provider has no quote with this identifier
    #[error("No quote found with id {0}")]
    NotFound(String),

    /// Network, auth or API failure of any provider call
    #[error("CRM provider call failed: {0}")]
    Provider(#[source] BoxedError),

    /// The enriched quote could not be encoded
    #[error("Failed to serialize enriched quote: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Quote {quote_id} has {count} associations, limit is {limit}")]
    AssociationLimitExceeded {
        quote_id: String,
        count: usize,
        limit: usize,
    },

    #[error("CRM lookups did not finish within {0:?}")]
    DeadlineExceeded(Duration),

    /// Startup only: handler state could not be built
    #[error("Invalid quote verification configuration: {0}")]
    Config(String),
}

impl VerifyError {
    pub(crate) fn provider<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        VerifyError::Provider(BoxedError(Box::new(err)))
    }

    /// Caller mistakes are logged at WARN, everything else at ERROR.
    pub fn log(&self) {
        match self {
            VerifyError::MissingParameter | VerifyError::NotFound(_) => {
                warn!("[Quotes] {}", self)
            }
            _ => error!("[Quotes] {}", self),
        }
    }
}

impl From<VerifyError> for QuoteVerifyError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::MissingParameter => missing_parameter("quoteId"),
            VerifyError::NotFound(id) => not_found(format!("No quote found with id {}", id)),
            VerifyError::Provider(e) => external_service_error("CRM provider", e),
            VerifyError::Serialization(e) => e.into(),
            e @ VerifyError::AssociationLimitExceeded { .. } => internal_error(e),
            VerifyError::DeadlineExceeded(d) => QuoteVerifyError::TimeoutError(format!(
                "CRM lookups did not finish within {:?}",
                d
            )),
            VerifyError::Config(msg) => config_error(msg),
        }
    }
}

impl HttpStatusCode for VerifyError {
    fn status_code(&self) -> u16 {
        match self {
            VerifyError::MissingParameter => 400,
            VerifyError::NotFound(_) => 404,
            VerifyError::DeadlineExceeded(_) => 504,
            VerifyError::Provider(_)
            | VerifyError::Serialization(_)
            | VerifyError::AssociationLimitExceeded { .. }
            | VerifyError::Config(_) => 500,
        }
    }
}
