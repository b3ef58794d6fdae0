// --- File: crates/quoteverify_quotes/src/logic.rs ---
use quoteverify_common::services::{AssociationKind, CrmRecord, CrmService, QuoteRecord};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::VerifyError;

/// Query parameter carrying the enriched quote on the redirect target.
pub const QUOTE_VERIFIED_PARAM: &str = "quoteVerified";

/// Associations requested with every quote, in the order they are merged.
pub const ASSOCIATION_KINDS: [AssociationKind; 2] =
    [AssociationKind::Contact, AssociationKind::Company];

/// A fetched contact or company, tagged with its relation type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociatedEntity {
    #[serde(rename = "type")]
    pub kind: AssociationKind,
    #[serde(flatten)]
    pub record: CrmRecord,
}

/// The quote as returned by the provider plus the full associated records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedQuote {
    #[serde(flatten)]
    pub quote: QuoteRecord,
    #[serde(rename = "associatesDetails", default)]
    pub associates_details: Vec<AssociatedEntity>,
}

/// Limits applied to one verification request.
#[derive(Debug, Clone, Copy)]
pub struct VerifyLimits {
    pub max_associations: usize,
    pub deadline: Duration,
}

/// Fetches the quote and then each associated contact and company, one call at a time.
///
/// Contacts come before companies; within a kind the provider's order is kept,
/// including repeated identifiers. Any failed call aborts the whole enrichment.
pub async fn enrich_quote<S>(
    crm: &S,
    quote_id: &str,
    max_associations: usize,
) -> Result<EnrichedQuote, VerifyError>
where
    S: CrmService + ?Sized,
{
    let quote = crm
        .get_quote(quote_id, &ASSOCIATION_KINDS)
        .await
        .map_err(VerifyError::provider)?
        .ok_or_else(|| VerifyError::NotFound(quote_id.to_string()))?;

    let count = quote.association_count();
    if count > max_associations {
        return Err(VerifyError::AssociationLimitExceeded {
            quote_id: quote_id.to_string(),
            count,
            limit: max_associations,
        });
    }

    let mut associates_details = Vec::with_capacity(count);
    for kind in ASSOCIATION_KINDS {
        for id in quote.association_ids(kind) {
            debug!("[Quotes] Fetching {} {} for quote {}", kind, id, quote_id);
            let record = crm
                .get_associated(kind, id)
                .await
                .map_err(VerifyError::provider)?;
            associates_details.push(AssociatedEntity { kind, record });
        }
    }

    Ok(EnrichedQuote {
        quote,
        associates_details,
    })
}

/// Appends the serialized quote as `quoteVerified` to `base`, keeping its existing query.
pub fn build_redirect_url(base: &Url, enriched: &EnrichedQuote) -> Result<Url, VerifyError> {
    let payload = serde_json::to_string(enriched)?;
    debug!("[Quotes] Enriched quote payload: {}", payload);

    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair(QUOTE_VERIFIED_PARAM, &payload);
    Ok(url)
}

/// Runs the full verification for one quote and returns the redirect target.
pub async fn verify_quote<S>(
    crm: &S,
    quote_id: &str,
    limits: VerifyLimits,
    redirect_base: &Url,
) -> Result<Url, VerifyError>
where
    S: CrmService + ?Sized,
{
    let enriched = tokio::time::timeout(
        limits.deadline,
        enrich_quote(crm, quote_id, limits.max_associations),
    )
    .await
    .map_err(|_| VerifyError::DeadlineExceeded(limits.deadline))??;

    info!(
        "[Quotes] Verified quote {} with {} associated records",
        quote_id,
        enriched.associates_details.len()
    );
    build_redirect_url(redirect_base, &enriched)
}
