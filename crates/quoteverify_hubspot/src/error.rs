// --- File: crates/quoteverify_hubspot/src/error.rs ---
use thiserror::Error;

/// HubSpot-specific error types.
#[derive(Error, Debug)]
pub enum HubSpotError {
    /// The request could not be sent or the response not read (network, timeout)
    #[error("HubSpot API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Non-2xx status returned by the HubSpot API
    #[error("HubSpot API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Error parsing a HubSpot API response
    #[error("Failed to parse HubSpot API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The configured API base URL cannot carry object paths
    #[error("Invalid HubSpot API URL: {0}")]
    InvalidUrl(String),
}
