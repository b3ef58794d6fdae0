// --- File: crates/quoteverify_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all quote verification crates.
///
/// Each crate keeps its own error enum and implements
/// `From<CrateError> for QuoteVerifyError` to surface it over HTTP.
#[derive(Error, Debug)]
pub enum QuoteVerifyError {
    /// A required request parameter was missing or empty
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// Error occurred while parsing or serializing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The CRM provider could not be reached or rejected the request
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to a timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for QuoteVerifyError {
    fn status_code(&self) -> u16 {
        match self {
            QuoteVerifyError::MissingParameter(_) => 400,
            QuoteVerifyError::ParseError(_) => 500,
            QuoteVerifyError::ConfigError(_) => 500,
            QuoteVerifyError::ExternalServiceError { .. } => 500,
            QuoteVerifyError::NotFoundError(_) => 404,
            QuoteVerifyError::TimeoutError(_) => 504,
            QuoteVerifyError::InternalError(_) => 500,
        }
    }
}

impl From<serde_json::Error> for QuoteVerifyError {
    fn from(err: serde_json::Error) -> Self {
        QuoteVerifyError::ParseError(err.to_string())
    }
}

// Utility functions for error handling
pub fn missing_parameter<T: fmt::Display>(name: T) -> QuoteVerifyError {
    QuoteVerifyError::MissingParameter(name.to_string())
}

pub fn config_error<T: fmt::Display>(message: T) -> QuoteVerifyError {
    QuoteVerifyError::ConfigError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> QuoteVerifyError {
    QuoteVerifyError::NotFoundError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> QuoteVerifyError {
    QuoteVerifyError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> QuoteVerifyError {
    QuoteVerifyError::InternalError(message.to_string())
}
