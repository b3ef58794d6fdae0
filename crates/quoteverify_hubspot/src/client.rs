// --- File: crates/quoteverify_hubspot/src/client.rs ---
//! HubSpot CRM v3 object reads.
//!
//! The client is built once per process from [`HubSpotConfig`] and shared by
//! all requests; `reqwest::Client` pools connections internally.

use quoteverify_common::{create_client, AssociationKind, CrmRecord, QuoteRecord};
use quoteverify_config::HubSpotConfig;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use tracing::{debug, error};

use crate::error::HubSpotError;

#[derive(Clone)]
pub struct HubSpotClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl fmt::Debug for HubSpotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubSpotClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HubSpotClient {
    /// Builds a client with the configured base URL, credential and per-call timeout.
    pub fn new(config: &HubSpotConfig) -> Result<Self, HubSpotError> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| HubSpotError::InvalidUrl(format!("{}: {}", config.api_base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(HubSpotError::InvalidUrl(config.api_base_url.clone()));
        }

        let http = create_client(config.request_timeout_secs, false)?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// `{base}/crm/v3/objects/{object_type}/{id}`, with `id` percent-encoded.
    fn object_url(&self, object_type: &str, id: &str) -> Result<Url, HubSpotError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| HubSpotError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["crm", "v3", "objects", object_type, id]);
        Ok(url)
    }

    fn get(&self, url: Url) -> RequestBuilder {
        self.http.get(url).bearer_auth(&self.api_key)
    }

    /// `GET /crm/v3/objects/quotes/{id}?associations=...&archived=false`
    ///
    /// A 404 or an empty body means the quote does not exist and yields `Ok(None)`.
    pub async fn fetch_quote(
        &self,
        quote_id: &str,
        associations: &[AssociationKind],
    ) -> Result<Option<QuoteRecord>, HubSpotError> {
        let url = self.object_url("quotes", quote_id)?;
        let associations = associations
            .iter()
            .map(AssociationKind::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let mut request = self.get(url);
        if !associations.is_empty() {
            request = request.query(&[("associations", associations.as_str())]);
        }
        let response = request.query(&[("archived", "false")]).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("[HubSpot] Quote {} not found", quote_id);
            return Ok(None);
        }

        let body_text = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status, body_text));
        }
        if body_text.trim().is_empty() {
            debug!("[HubSpot] Empty body for quote {}", quote_id);
            return Ok(None);
        }

        // `null` also counts as no quote.
        Ok(serde_json::from_str::<Option<QuoteRecord>>(&body_text)?)
    }

    /// `GET /crm/v3/objects/{contacts|companies}/{id}`
    pub async fn fetch_object(
        &self,
        kind: AssociationKind,
        id: &str,
    ) -> Result<CrmRecord, HubSpotError> {
        let url = self.object_url(kind.plural(), id)?;
        let response = self.get(url).send().await?;

        let status = response.status();
        let body_text = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status, body_text));
        }

        Ok(serde_json::from_str(&body_text)?)
    }
}

/// Builds an `ApiError`, taking the message from HubSpot's JSON `message` field when present.
fn api_error(status: StatusCode, body_text: String) -> HubSpotError {
    let message = match serde_json::from_str::<Value>(&body_text) {
        Ok(json_body) => json_body
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or(body_text),
        Err(_) => body_text,
    };
    error!("[HubSpot] API error: {} - {}", status, message);
    HubSpotError::ApiError {
        status_code: status.as_u16(),
        message,
    }
}
