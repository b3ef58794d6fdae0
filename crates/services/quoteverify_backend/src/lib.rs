// File: services/quoteverify_backend/src/lib.rs
use axum::{routing::get, Json, Router};
use quoteverify_common::{BoxedCrmService, BoxedError, CrmService};
use quoteverify_config::{AppConfig, ConfigLoadError};
use quoteverify_hubspot::{HubSpotClient, HubSpotError};
use quoteverify_quotes::VerifyError;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Everything that can stop the service from starting or serving.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigLoadError),
    #[error("Failed to create HubSpot client: {0}")]
    HubSpot(#[from] HubSpotError),
    #[error(transparent)]
    Routes(#[from] VerifyError),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// The HubSpot client for this process, shared by all requests.
pub fn hubspot_service(
    config: &AppConfig,
) -> Result<Arc<dyn CrmService<Error = BoxedError>>, StartupError> {
    let client = HubSpotClient::new(&config.hubspot)?;
    Ok(Arc::new(BoxedCrmService(client)))
}

/// Assembles the full router: banner, health check, quote verification and (with `openapi`) Swagger UI.
pub fn build_app(
    config: Arc<AppConfig>,
    crm: Arc<dyn CrmService<Error = BoxedError>>,
) -> Result<Router, StartupError> {
    let quotes_router = quoteverify_quotes::routes(config.clone(), crm)?;

    #[allow(unused_mut)] // only mutated with the openapi feature
    let mut app = Router::new()
        .route("/", get(|| async { "Quote verification service" }))
        .route("/health", get(health))
        .merge(quotes_router);

    #[cfg(feature = "openapi")]
    {
        use quoteverify_quotes::doc::QuotesApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Quote Verification API",
                version = "0.1.0",
                description = "Verifies HubSpot quotes and redirects with the enriched payload",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            tags((name = "Quotes", description = "HubSpot quote verification"))
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(QuotesApiDoc::openapi());
        info!("Adding Swagger UI at /docs");
        app = app.merge(SwaggerUi::new("/docs").url("/docs/openapi.json", openapi_doc));
    }

    Ok(app.layer(TraceLayer::new_for_http()))
}

/// Binds `server.host:server.port` and serves until the process stops.
pub async fn serve(config: Arc<AppConfig>, app: Router) -> Result<(), StartupError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!(
        "Quote verification available at http://{}{}",
        addr, config.verify.route_path
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
