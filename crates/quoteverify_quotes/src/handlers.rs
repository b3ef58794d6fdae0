// --- File: crates/quoteverify_quotes/src/handlers.rs ---
use axum::{
    extract::{RawQuery, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use quoteverify_common::{BoxedError, CrmService, QuoteVerifyError};
use quoteverify_config::{AppConfig, ErrorPolicy};
use reqwest::Url;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::error::VerifyError;
use crate::logic::{verify_quote, VerifyLimits};

// --- State for Quote Verification Handlers ---
#[derive(Clone)]
pub struct VerifyState {
    pub crm: Arc<dyn CrmService<Error = BoxedError>>,
    pub redirect_base: Url,
    /// `redirect.base_url` as configured; the bare failure redirect.
    pub fallback_location: String,
    pub error_policy: ErrorPolicy,
    pub limits: VerifyLimits,
}

impl VerifyState {
    /// Builds the handler state; fails when the redirect base URL is not an absolute http(s) URL.
    pub fn new(
        config: &AppConfig,
        crm: Arc<dyn CrmService<Error = BoxedError>>,
    ) -> Result<Self, VerifyError> {
        let redirect_base = parse_redirect_base(&config.redirect.base_url)?;
        let fallback_location = fallback_location(&config.redirect.base_url, &redirect_base);
        Ok(Self {
            crm,
            redirect_base,
            fallback_location,
            error_policy: config.verify.error_policy,
            limits: VerifyLimits {
                max_associations: config.verify.max_associations,
                deadline: Duration::from_secs(config.verify.request_deadline_secs),
            },
        })
    }

    /// The single terminal response for a failed request.
    fn failure_response(&self, err: VerifyError) -> Response {
        match self.error_policy {
            ErrorPolicy::Redirect => found(&self.fallback_location),
            ErrorPolicy::Json => QuoteVerifyError::from(err).into_response(),
        }
    }
}

fn parse_redirect_base(raw: &str) -> Result<Url, VerifyError> {
    let url = Url::parse(raw)
        .map_err(|e| VerifyError::Config(format!("redirect.base_url '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(VerifyError::Config(format!(
            "redirect.base_url must be http(s), got scheme '{}'",
            other
        ))),
    }
}

/// The configured base URL as written, unless it cannot be sent as a header value.
fn fallback_location(raw: &str, parsed: &Url) -> String {
    let raw = raw.trim();
    match HeaderValue::from_str(raw) {
        Ok(_) => raw.to_string(),
        Err(_) => parsed.to_string(),
    }
}

/// `302 Found` to `location`.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[derive(Debug, Deserialize)]
pub struct VerifyQuoteQuery {
    /// HubSpot quote identifier
    #[serde(rename = "quoteId")]
    pub quote_id: Option<String>,
}

impl VerifyQuoteQuery {
    /// Reads `quoteId` from a raw query string. A repeated parameter yields its first value.
    pub fn from_raw(query: Option<&str>) -> Self {
        let quote_id = query.and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "quoteId")
                .map(|(_, value)| value.into_owned())
        });
        Self { quote_id }
    }
}

/// Resolves `quoteId` against the CRM and redirects with the enriched quote.
#[axum::debug_handler]
pub async fn verify_quote_handler(
    State(state): State<Arc<VerifyState>>,
    RawQuery(raw_query): RawQuery,
) -> Response {
    let query = VerifyQuoteQuery::from_raw(raw_query.as_deref());
    let quote_id = query
        .quote_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let result = match quote_id {
        Some(id) => verify_quote(state.crm.as_ref(), id, state.limits, &state.redirect_base).await,
        None => Err(VerifyError::MissingParameter),
    };

    match result {
        Ok(location) => found(location.as_str()),
        Err(err) => {
            err.log();
            state.failure_response(err)
        }
    }
}
