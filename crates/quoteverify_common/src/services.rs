// --- File: crates/quoteverify_common/src/services.rs ---
//! Service abstractions for the CRM provider.
//!
//! Handlers depend on [`CrmService`] rather than on a concrete HTTP client so
//! that the provider can be swapped for the in-memory `mock::MockCrmService` in tests.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// Relation types a quote can be associated with.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssociationKind {
    Contact,
    Company,
}

impl AssociationKind {
    /// Singular object name, as used in `?associations=` and in the `type` tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssociationKind::Contact => "contact",
            AssociationKind::Company => "company",
        }
    }

    /// Plural key used in the association listing and in object paths.
    pub fn plural(&self) -> &'static str {
        match self {
            AssociationKind::Contact => "contacts",
            AssociationKind::Company => "companies",
        }
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A CRM object (contact, company): its identifier plus every other field as returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrmRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// One entry of an association listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRef {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Association listing for one relation type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssociationList {
    #[serde(default)]
    pub results: Vec<AssociationRef>,
    /// Paging and any other provider metadata, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuoteAssociations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<AssociationList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub companies: Option<AssociationList>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A quote as returned by the provider, including its association listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associations: Option<QuoteAssociations>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl QuoteRecord {
    /// Associated identifiers of one kind, in provider order (duplicates kept).
    pub fn association_ids(&self, kind: AssociationKind) -> Vec<&str> {
        let list = self.associations.as_ref().and_then(|a| match kind {
            AssociationKind::Contact => a.contacts.as_ref(),
            AssociationKind::Company => a.companies.as_ref(),
        });
        list.map(|l| l.results.iter().map(|r| r.id.as_str()).collect())
            .unwrap_or_default()
    }

    /// Number of contact and company associations together.
    pub fn association_count(&self) -> usize {
        self.association_ids(AssociationKind::Contact).len()
            + self.association_ids(AssociationKind::Company).len()
    }
}

// HubSpot sends identifiers as strings, older payloads as numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Num(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Str(s) => s,
        Id::Num(n) => n.to_string(),
    })
}

/// A trait for CRM read operations.
///
/// Implementations must not retry; every failure is reported to the caller.
pub trait CrmService: Send + Sync {
    /// Error type returned by CRM operations.
    type Error: StdError + Send + Sync + 'static;

    /// Fetch a quote with its association listing for the given kinds.
    ///
    /// Returns `Ok(None)` when the provider does not know the quote.
    fn get_quote(
        &self,
        quote_id: &str,
        associations: &[AssociationKind],
    ) -> BoxFuture<'_, Option<QuoteRecord>, Self::Error>;

    /// Fetch a contact by identifier.
    fn get_contact(&self, contact_id: &str) -> BoxFuture<'_, CrmRecord, Self::Error>;

    /// Fetch a company by identifier.
    fn get_company(&self, company_id: &str) -> BoxFuture<'_, CrmRecord, Self::Error>;

    /// Fetch an associated object by kind.
    fn get_associated(
        &self,
        kind: AssociationKind,
        id: &str,
    ) -> BoxFuture<'_, CrmRecord, Self::Error> {
        match kind {
            AssociationKind::Contact => self.get_contact(id),
            AssociationKind::Company => self.get_company(id),
        }
    }
}

/// Adapts any [`CrmService`] to `CrmService<Error = BoxedError>` so it can be
/// stored as a trait object in handler state.
pub struct BoxedCrmService<S>(pub S);

impl<S: CrmService> CrmService for BoxedCrmService<S> {
    type Error = BoxedError;

    fn get_quote(
        &self,
        quote_id: &str,
        associations: &[AssociationKind],
    ) -> BoxFuture<'_, Option<QuoteRecord>, Self::Error> {
        let fut = self.0.get_quote(quote_id, associations);
        Box::pin(async move { fut.await.map_err(|e| BoxedError(Box::new(e))) })
    }

    fn get_contact(&self, contact_id: &str) -> BoxFuture<'_, CrmRecord, Self::Error> {
        let fut = self.0.get_contact(contact_id);
        Box::pin(async move { fut.await.map_err(|e| BoxedError(Box::new(e))) })
    }

    fn get_company(&self, company_id: &str) -> BoxFuture<'_, CrmRecord, Self::Error> {
        let fut = self.0.get_company(company_id);
        Box::pin(async move { fut.await.map_err(|e| BoxedError(Box::new(e))) })
    }
}

/// Lets one service instance be shared between handler state and its owner.
impl<S: CrmService + ?Sized> CrmService for Arc<S> {
    type Error = S::Error;

    fn get_quote(
        &self,
        quote_id: &str,
        associations: &[AssociationKind],
    ) -> BoxFuture<'_, Option<QuoteRecord>, Self::Error> {
        (**self).get_quote(quote_id, associations)
    }

    fn get_contact(&self, contact_id: &str) -> BoxFuture<'_, CrmRecord, Self::Error> {
        (**self).get_contact(contact_id)
    }

    fn get_company(&self, company_id: &str) -> BoxFuture<'_, CrmRecord, Self::Error> {
        (**self).get_company(company_id)
    }
}

/// In-memory implementation of CrmService for tests.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Mutex, MutexGuard};
    use std::time::Duration;
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum MockCrmError {
        #[error("{kind} {id} not found")]
        UnknownObject { kind: &'static str, id: String },
        #[error("injected failure for {0}")]
        Injected(String),
    }

    /// Mock CRM holding quotes, contacts and companies in memory.
    ///
    /// Every call is recorded as `"<kind>:<id>"` (e.g. `"quote:q1"`,
    /// `"contact:c2"`); the same key passed to [`fail_on`](Self::fail_on) makes
    /// that call fail.
    #[derive(Default)]
    pub struct MockCrmService {
        quotes: Mutex<HashMap<String, QuoteRecord>>,
        contacts: Mutex<HashMap<String, CrmRecord>>,
        companies: Mutex<HashMap<String, CrmRecord>>,
        failures: Mutex<HashSet<String>>,
        calls: Mutex<Vec<String>>,
        delay: Option<Duration>,
    }

    fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
        m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    impl MockCrmService {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_quote(self, quote: QuoteRecord) -> Self {
            lock(&self.quotes).insert(quote.id.clone(), quote);
            self
        }

        pub fn with_contact(self, contact: CrmRecord) -> Self {
            lock(&self.contacts).insert(contact.id.clone(), contact);
            self
        }

        pub fn with_company(self, company: CrmRecord) -> Self {
            lock(&self.companies).insert(company.id.clone(), company);
            self
        }

        pub fn fail_on(self, call: &str) -> Self {
            lock(&self.failures).insert(call.to_string());
            self
        }

        /// Sleep this long before answering each call.
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Calls made so far, in order.
        pub fn calls(&self) -> Vec<String> {
            lock(&self.calls).clone()
        }

        async fn record(&self, call: String) -> Result<(), MockCrmError> {
            lock(&self.calls).push(call.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if lock(&self.failures).contains(&call) {
                return Err(MockCrmError::Injected(call));
            }
            Ok(())
        }

        fn lookup(
            map: &Mutex<HashMap<String, CrmRecord>>,
            kind: &'static str,
            id: &str,
        ) -> Result<CrmRecord, MockCrmError> {
            lock(map)
                .get(id)
                .cloned()
                .ok_or_else(|| MockCrmError::UnknownObject {
                    kind,
                    id: id.to_string(),
                })
        }
    }

    impl CrmService for MockCrmService {
        type Error = MockCrmError;

        fn get_quote(
            &self,
            quote_id: &str,
            _associations: &[AssociationKind],
        ) -> BoxFuture<'_, Option<QuoteRecord>, Self::Error> {
            let quote_id = quote_id.to_string();
            Box::pin(async move {
                self.record(format!("quote:{}", quote_id)).await?;
                Ok(lock(&self.quotes).get(&quote_id).cloned())
            })
        }

        fn get_contact(&self, contact_id: &str) -> BoxFuture<'_, CrmRecord, Self::Error> {
            let contact_id = contact_id.to_string();
            Box::pin(async move {
                self.record(format!("contact:{}", contact_id)).await?;
                Self::lookup(&self.contacts, "contact", &contact_id)
            })
        }

        fn get_company(&self, company_id: &str) -> BoxFuture<'_, CrmRecord, Self::Error> {
            let company_id = company_id.to_string();
            Box::pin(async move {
                self.record(format!("company:{}", company_id)).await?;
                Self::lookup(&self.companies, "company", &company_id)
            })
        }
    }
}
