#[cfg(test)]
mod tests {
    use crate::error::VerifyError;
    use crate::logic::{
        build_redirect_url, enrich_quote, verify_quote, EnrichedQuote, VerifyLimits,
        QUOTE_VERIFIED_PARAM,
    };
    use quoteverify_common::services::mock::MockCrmService;
    use quoteverify_common::{AssociationKind, CrmRecord, QuoteRecord};
    use reqwest::Url;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn quote(id: &str, contacts: &[&str], companies: &[&str]) -> QuoteRecord {
        let refs = |ids: &[&str], kind: &str| -> Value {
            json!({ "results": ids.iter().map(|id| json!({ "id": id, "type": kind })).collect::<Vec<_>>() })
        };
        let mut associations = serde_json::Map::new();
        if !contacts.is_empty() {
            associations.insert("contacts".into(), refs(contacts, "quote_to_contact"));
        }
        if !companies.is_empty() {
            associations.insert("companies".into(), refs(companies, "quote_to_company"));
        }
        let mut value = json!({
            "id": id,
            "properties": { "hs_title": "Website relaunch", "hs_expiration_date": "2024-12-31" },
            "createdAt": "2024-03-01T10:00:00Z",
            "archived": false
        });
        if !associations.is_empty() {
            value["associations"] = Value::Object(associations);
        }
        serde_json::from_value(value).unwrap()
    }

    fn record(id: &str, name: &str) -> CrmRecord {
        serde_json::from_value(json!({ "id": id, "properties": { "name": name } })).unwrap()
    }

    fn limits() -> VerifyLimits {
        VerifyLimits {
            max_associations: 100,
            deadline: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn zero_associations_give_empty_details_and_unchanged_quote() {
        let original = quote("q1", &[], &[]);
        let crm = MockCrmService::new().with_quote(original.clone());

        let enriched = enrich_quote(&crm, "q1", 100).await.unwrap();

        assert!(enriched.associates_details.is_empty());
        assert_eq!(enriched.quote, original);
        assert_eq!(crm.calls(), vec!["quote:q1"]);

        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["associatesDetails"], json!([]));
        assert_eq!(value["properties"]["hs_title"], "Website relaunch");
    }

    #[tokio::test]
    async fn contacts_precede_companies_in_provider_order() {
        let crm = MockCrmService::new()
            .with_quote(quote("q1", &["c2", "c1"], &["co1"]))
            .with_contact(record("c1", "Ada"))
            .with_contact(record("c2", "Grace"))
            .with_company(record("co1", "Analytical Engines"));

        let enriched = enrich_quote(&crm, "q1", 100).await.unwrap();

        let tagged: Vec<(AssociationKind, &str)> = enriched
            .associates_details
            .iter()
            .map(|e| (e.kind, e.record.id.as_str()))
            .collect();
        assert_eq!(
            tagged,
            vec![
                (AssociationKind::Contact, "c2"),
                (AssociationKind::Contact, "c1"),
                (AssociationKind::Company, "co1"),
            ]
        );
        assert_eq!(
            crm.calls(),
            vec!["quote:q1", "contact:c2", "contact:c1", "company:co1"]
        );

        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["associatesDetails"][0]["type"], "contact");
        assert_eq!(value["associatesDetails"][0]["properties"]["name"], "Grace");
        assert_eq!(value["associatesDetails"][2]["type"], "company");
    }

    #[tokio::test]
    async fn repeated_identifiers_are_fetched_each_time() {
        let crm = MockCrmService::new()
            .with_quote(quote("q1", &["c1", "c1"], &[]))
            .with_contact(record("c1", "Ada"));

        let enriched = enrich_quote(&crm, "q1", 100).await.unwrap();

        assert_eq!(enriched.associates_details.len(), 2);
        assert_eq!(crm.calls(), vec!["quote:q1", "contact:c1", "contact:c1"]);
    }

    #[tokio::test]
    async fn unknown_quote_is_not_found_without_further_calls() {
        let crm = MockCrmService::new().with_contact(record("c1", "Ada"));

        let err = enrich_quote(&crm, "missing", 100).await.unwrap_err();

        assert!(matches!(err, VerifyError::NotFound(ref id) if id == "missing"));
        assert_eq!(crm.calls(), vec!["quote:missing"]);
    }

    #[tokio::test]
    async fn failing_quote_lookup_makes_no_association_calls() {
        let crm = MockCrmService::new()
            .with_quote(quote("q1", &["c1"], &["co1"]))
            .fail_on("quote:q1");

        let err = enrich_quote(&crm, "q1", 100).await.unwrap_err();

        assert!(matches!(err, VerifyError::Provider(_)));
        assert_eq!(crm.calls(), vec!["quote:q1"]);
    }

    #[tokio::test]
    async fn failing_contact_aborts_the_enrichment() {
        let crm = MockCrmService::new()
            .with_quote(quote("q1", &["c1", "c2", "c3"], &["co1"]))
            .with_contact(record("c1", "Ada"))
            .with_contact(record("c2", "Grace"))
            .with_contact(record("c3", "Edsger"))
            .with_company(record("co1", "Analytical Engines"))
            .fail_on("contact:c2");

        let err = enrich_quote(&crm, "q1", 100).await.unwrap_err();

        match err {
            VerifyError::Provider(e) => assert!(e.to_string().contains("contact:c2")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(crm.calls(), vec!["quote:q1", "contact:c1", "contact:c2"]);
    }

    #[tokio::test]
    async fn too_many_associations_fail_before_any_fetch() {
        let crm = MockCrmService::new()
            .with_quote(quote("q1", &["c1", "c2"], &["co1"]))
            .with_contact(record("c1", "Ada"));

        let err = enrich_quote(&crm, "q1", 2).await.unwrap_err();

        assert!(matches!(
            err,
            VerifyError::AssociationLimitExceeded {
                count: 3,
                limit: 2,
                ..
            }
        ));
        assert_eq!(crm.calls(), vec!["quote:q1"]);
    }

    #[tokio::test]
    async fn association_count_at_the_limit_is_allowed() {
        let crm = MockCrmService::new()
            .with_quote(quote("q1", &["c1"], &["co1"]))
            .with_contact(record("c1", "Ada"))
            .with_company(record("co1", "Analytical Engines"));

        let enriched = enrich_quote(&crm, "q1", 2).await.unwrap();

        assert_eq!(enriched.associates_details.len(), 2);
    }

    #[tokio::test]
    async fn redirect_payload_round_trips_to_the_enriched_quote() {
        let crm = MockCrmService::new()
            .with_quote(quote("q1", &["c1"], &["co1"]))
            .with_contact(record("c1", "Ada Lovelace & Co? 100% #1"))
            .with_company(record("co1", "Analytical Engines"));
        let enriched = enrich_quote(&crm, "q1", 100).await.unwrap();
        let base = Url::parse("https://shop.example.com/quote/verified").unwrap();

        let url = build_redirect_url(&base, &enriched).unwrap();

        assert_eq!(url.path(), "/quote/verified");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, QUOTE_VERIFIED_PARAM);
        let decoded: EnrichedQuote = serde_json::from_str(&pairs[0].1).unwrap();
        assert_eq!(decoded, enriched);
    }

    #[test]
    fn redirect_keeps_existing_query_of_base_url() {
        let enriched = EnrichedQuote {
            quote: quote("q9", &[], &[]),
            associates_details: Vec::new(),
        };
        let base = Url::parse("https://shop.example.com/verified?lang=de").unwrap();

        let url = build_redirect_url(&base, &enriched).unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("lang".to_string(), "de".to_string()));
        assert_eq!(pairs[1].0, QUOTE_VERIFIED_PARAM);
    }

    #[tokio::test]
    async fn verify_quote_enforces_the_deadline() {
        let crm = MockCrmService::new()
            .with_quote(quote("q1", &["c1"], &[]))
            .with_contact(record("c1", "Ada"))
            .with_delay(Duration::from_millis(200));
        let base = Url::parse("https://shop.example.com/verified").unwrap();
        let limits = VerifyLimits {
            max_associations: 100,
            deadline: Duration::from_millis(50),
        };

        let err = verify_quote(&crm, "q1", limits, &base).await.unwrap_err();

        assert!(matches!(err, VerifyError::DeadlineExceeded(d) if d == Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn verify_quote_returns_redirect_with_payload() {
        let crm = MockCrmService::new().with_quote(quote("q1", &[], &[]));
        let base = Url::parse("https://shop.example.com/verified").unwrap();

        let url = verify_quote(&crm, "q1", limits(), &base).await.unwrap();

        assert!(url.as_str().starts_with("https://shop.example.com/verified?quoteVerified="));
    }
}
