// --- File: crates/quoteverify_quotes/src/routes.rs ---

use crate::error::VerifyError;
use crate::handlers::{verify_quote_handler, VerifyState};
use axum::{routing::get, Router};
use quoteverify_common::{BoxedError, CrmService};
use quoteverify_config::AppConfig;
use std::sync::Arc;

/// Creates a router with the quote verification route at `verify.route_path`.
pub fn routes(
    config: Arc<AppConfig>,
    crm: Arc<dyn CrmService<Error = BoxedError>>,
) -> Result<Router, VerifyError> {
    let verify_state = Arc::new(VerifyState::new(&config, crm)?);

    Ok(Router::new()
        .route(&config.verify.route_path, get(verify_quote_handler))
        .with_state(verify_state))
}
