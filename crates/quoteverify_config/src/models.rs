// --- File: crates/quoteverify_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::fmt;

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- HubSpot Config ---
// api_key defaults to the secret marker and is filled in by the active SecretResolver
// (HUBSPOT_API_KEY).
#[derive(Deserialize, Serialize, Clone)]
pub struct HubSpotConfig {
    pub api_key: String,
    pub api_base_url: String,
    /// Timeout applied to every single HubSpot call.
    pub request_timeout_secs: u64,
}

impl fmt::Debug for HubSpotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubSpotConfig")
            .field("api_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

// --- Redirect Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RedirectConfig {
    pub base_url: String, // Resolved from REDIRECT_BASE_URL
}

/// How request failures are reported to the caller.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Redirect to the bare base URL on every failure.
    #[default]
    Redirect,
    /// Return a JSON error body with a 4xx/5xx status.
    Json,
}

// --- Quote Verification Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VerifyConfig {
    pub route_path: String,
    #[serde(default)]
    pub error_policy: ErrorPolicy,
    /// Upper bound on contacts + companies fetched for one quote.
    pub max_associations: usize,
    /// Budget for the whole provider lookup of one request.
    pub request_deadline_secs: u64,
}

/// Paths served by the backend itself.
const RESERVED_PATHS: [&str; 3] = ["/", "/health", "/docs"];

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub hubspot: HubSpotConfig,
    pub redirect: RedirectConfig,
    pub verify: VerifyConfig,
}

impl AppConfig {
    /// Checks the values that cannot be expressed in the type alone.
    pub fn validate(&self) -> Result<(), String> {
        if self.hubspot.api_key.trim().is_empty() {
            return Err("hubspot.api_key must not be empty".to_string());
        }
        if self.redirect.base_url.trim().is_empty() {
            return Err("redirect.base_url must not be empty".to_string());
        }
        if !self.verify.route_path.starts_with('/') {
            return Err(format!(
                "verify.route_path must start with '/', got '{}'",
                self.verify.route_path
            ));
        }
        if RESERVED_PATHS.contains(&self.verify.route_path.as_str()) {
            return Err(format!(
                "verify.route_path '{}' collides with a built-in route",
                self.verify.route_path
            ));
        }
        if self.hubspot.request_timeout_secs == 0 || self.verify.request_deadline_secs == 0 {
            return Err("timeouts must be greater than zero".to_string());
        }
        Ok(())
    }
}
