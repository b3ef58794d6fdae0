// --- File: crates/quoteverify_config/src/lib.rs ---
use config::{Config, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub mod env_vars;
pub mod models;
pub mod secrets;

pub use env_vars::SECRET_MARKER;
pub use models::*;
pub use secrets::{
    resolver_from_env, ProcessEnvResolver, SecretResolver, SecretStoreResolver,
};

/// Directory holding `default.*` and `<RUN_ENV>.*` when `CONFIG_DIR` is unset.
pub const DEFAULT_CONFIG_DIR: &str = "config";

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Failed to load configuration: {0}")]
    Source(#[from] config::ConfigError),
    #[error("Failed to process configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Secrets not found in {source_name}: {}", .paths.join(", "))]
    UnresolvedSecrets {
        source_name: &'static str,
        paths: Vec<String>,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Loads the configuration for this process.
///
/// Loads `.env` first when `LOCAL_DEV=true`, then reads the layered config and
/// resolves secrets through [`resolver_from_env`].
pub fn load_config() -> Result<AppConfig, ConfigLoadError> {
    if let Some(path) = load_local_env() {
        info!("Local development: loaded environment from {}", path);
    }
    let resolver = resolver_from_env();
    load_config_with(resolver.as_ref())
}

/// Loads the configuration using `CONFIG_DIR` / `RUN_ENV` from the environment
/// and the given secret resolver.
pub fn load_config_with(resolver: &dyn SecretResolver) -> Result<AppConfig, ConfigLoadError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    load_config_from(Path::new(&config_dir), &run_env, resolver)
}

/// Builds the configuration from defaults, `<dir>/default`, `<dir>/<run_env>`
/// and `QUOTEVERIFY__*` variables, then replaces secret markers.
pub fn load_config_from(
    config_dir: &Path,
    run_env: &str,
    resolver: &dyn SecretResolver,
) -> Result<AppConfig, ConfigLoadError> {
    let prefix = env_vars::get_config_prefix();
    let default_path = config_dir.join("default");
    let env_path = config_dir.join(run_env);

    let builder = Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("hubspot.api_key", SECRET_MARKER)?
        .set_default("hubspot.api_base_url", "https://api.hubapi.com")?
        .set_default("hubspot.request_timeout_secs", 10)?
        .set_default("redirect.base_url", SECRET_MARKER)?
        .set_default("verify.route_path", "/verify-quote")?
        .set_default("verify.error_policy", "redirect")?
        .set_default("verify.max_associations", 100)?
        .set_default("verify.request_deadline_secs", 25)?
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    let config = apply_secrets(raw_config, resolver)?;
    config.validate().map_err(ConfigLoadError::Invalid)?;
    Ok(config)
}

/// Replaces all `secret_from_env` markers in `config` using `resolver`.
pub fn apply_secrets(
    config: AppConfig,
    resolver: &dyn SecretResolver,
) -> Result<AppConfig, ConfigLoadError> {
    let mut json = serde_json::to_value(&config)?;
    let missing = env_vars::inject_secrets(&mut json, resolver);
    if !missing.is_empty() {
        return Err(ConfigLoadError::UnresolvedSecrets {
            source_name: resolver.source_name(),
            paths: missing,
        });
    }
    Ok(serde_json::from_value(json)?)
}

/// Loads the dotenv file when `LOCAL_DEV=true` and returns its path.
///
/// Safe to call before logging starts so that `RUST_LOG` from `.env` applies.
pub fn load_local_env() -> Option<String> {
    let local_dev = env::var("LOCAL_DEV").map(|v| v == "true").unwrap_or(false);
    local_dev.then(ensure_dotenv_loaded)
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file is `DOTENV_OVERRIDE` when set, otherwise `.env`. Loading happens at
/// most once per process; a missing file is not an error.
///
/// Returns the path that was (or would have been) loaded.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = std::env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
