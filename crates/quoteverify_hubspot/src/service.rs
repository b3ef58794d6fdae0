// --- File: crates/quoteverify_hubspot/src/service.rs ---
//! HubSpot implementation of the CrmService trait.

use quoteverify_common::services::{AssociationKind, BoxFuture, CrmRecord, CrmService, QuoteRecord};

use crate::client::HubSpotClient;
use crate::error::HubSpotError;

impl CrmService for HubSpotClient {
    type Error = HubSpotError;

    fn get_quote(
        &self,
        quote_id: &str,
        associations: &[AssociationKind],
    ) -> BoxFuture<'_, Option<QuoteRecord>, Self::Error> {
        // Owned copies so the future only borrows the client
        let quote_id = quote_id.to_string();
        let associations = associations.to_vec();

        Box::pin(async move { self.fetch_quote(&quote_id, &associations).await })
    }

    fn get_contact(&self, contact_id: &str) -> BoxFuture<'_, CrmRecord, Self::Error> {
        let contact_id = contact_id.to_string();
        Box::pin(async move {
            self.fetch_object(AssociationKind::Contact, &contact_id)
                .await
        })
    }

    fn get_company(&self, company_id: &str) -> BoxFuture<'_, CrmRecord, Self::Error> {
        let company_id = company_id.to_string();
        Box::pin(async move {
            self.fetch_object(AssociationKind::Company, &company_id)
                .await
        })
    }
}
