// --- File: crates/quoteverify_quotes/src/doc.rs ---
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::VerifyQuoteQuery;

#[utoipa::path(
    get,
    path = "/verify-quote", // default verify.route_path
    params(VerifyQuoteQuery),
    responses(
        (status = 302, description = "Redirect to REDIRECT_BASE_URL; on success it carries `quoteVerified` (URL-encoded JSON of the quote with `associatesDetails`), on failure under the `redirect` error policy it is the bare base URL"),
        (status = 400, description = "Missing `quoteId` (`json` error policy)"),
        (status = 404, description = "Quote not found (`json` error policy)"),
        (status = 500, description = "CRM provider or serialization error (`json` error policy)"),
        (status = 504, description = "CRM lookups exceeded the request deadline (`json` error policy)")
    ),
    tag = "Quotes"
)]
fn doc_verify_quote_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_verify_quote_handler),
    tags(
        (name = "Quotes", description = "HubSpot quote verification")
    )
)]
pub struct QuotesApiDoc;
