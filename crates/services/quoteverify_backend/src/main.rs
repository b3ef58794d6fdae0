// File: services/quoteverify_backend/src/main.rs
use quoteverify_backend::{build_app, hubspot_service, serve, StartupError};
use quoteverify_common::logging;
use quoteverify_config::{load_config, load_local_env};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // .env may carry RUST_LOG, so it is read before the subscriber starts
    load_local_env();
    logging::init();

    let config = Arc::new(
        load_config().inspect_err(|e| logging::log_error(e, "Failed to load configuration"))?,
    );
    info!("Configuration loaded: {:?}", config);

    let crm = hubspot_service(&config)?;
    let app = build_app(config.clone(), crm)?;

    serve(config, app).await
}
