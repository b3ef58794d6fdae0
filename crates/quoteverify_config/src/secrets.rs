//! Secret resolution.
//!
//! Secrets (the HubSpot credential and the redirect base URL) come from one of
//! two places, chosen once at startup by [`resolver_from_env`]:
//!
//! * [`ProcessEnvResolver`] reads the process environment (local runs, CI).
//! * [`SecretStoreResolver`] reads the platform secret store, mounted as a
//!   directory with one file per variable name (`/run/secrets/HUBSPOT_API_KEY`).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::env_vars::secret_path_to_env_var;

/// Directory of the platform secret store when `SECRETS_DIR` is unset.
pub const DEFAULT_SECRETS_DIR: &str = "/run/secrets";

/// Looks up secret values by configuration path (e.g. `hubspot.api_key`).
pub trait SecretResolver: Send + Sync {
    /// Short name used in log lines and error messages.
    fn source_name(&self) -> &'static str;

    /// Returns the secret for `path`, or `None` when it is unset or empty.
    fn resolve(&self, path: &str) -> Option<String>;
}

/// Resolves secrets from process environment variables.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvResolver;

impl SecretResolver for ProcessEnvResolver {
    fn source_name(&self) -> &'static str {
        "process environment"
    }

    fn resolve(&self, path: &str) -> Option<String> {
        let var = secret_path_to_env_var(path);
        env::var(&var).ok().filter(|v| !v.is_empty())
    }
}

/// Resolves secrets from files in a directory provided by the hosting platform.
#[derive(Debug, Clone)]
pub struct SecretStoreResolver {
    dir: PathBuf,
}

impl SecretStoreResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SecretResolver for SecretStoreResolver {
    fn source_name(&self) -> &'static str {
        "platform secret store"
    }

    fn resolve(&self, path: &str) -> Option<String> {
        let file = self.dir.join(secret_path_to_env_var(path));
        match fs::read_to_string(&file) {
            Ok(content) => {
                // Mounted secrets usually end with a newline.
                let value = content.trim_end_matches(['\r', '\n']).to_string();
                (!value.is_empty()).then_some(value)
            }
            Err(err) => {
                debug!("Secret file {} not readable: {}", file.display(), err);
                None
            }
        }
    }
}

/// Selects the secret source for this process.
///
/// `RUN_ENV=production` selects the platform secret store (`SECRETS_DIR`,
/// default [`DEFAULT_SECRETS_DIR`]); anything else reads the process environment.
pub fn resolver_from_env() -> Box<dyn SecretResolver> {
    let run_env = env::var("RUN_ENV").unwrap_or_default();
    if run_env == "production" {
        let dir = env::var("SECRETS_DIR").unwrap_or_else(|_| DEFAULT_SECRETS_DIR.to_string());
        info!("Reading secrets from platform secret store at {}", dir);
        Box::new(SecretStoreResolver::new(dir))
    } else {
        info!("Reading secrets from process environment");
        Box::new(ProcessEnvResolver)
    }
}
