use quoteverify_common::{AssociationKind, CrmService};
use quoteverify_config::HubSpotConfig;
use quoteverify_hubspot::{HubSpotClient, HubSpotError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HubSpotClient {
    HubSpotClient::new(&HubSpotConfig {
        api_key: "pat-test".to_string(),
        api_base_url: server.uri(),
        request_timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn get_quote_sends_bearer_token_and_association_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crm/v3/objects/quotes/q1"))
        .and(query_param("associations", "contact,company"))
        .and(query_param("archived", "false"))
        .and(header("authorization", "Bearer pat-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "q1",
            "properties": { "hs_title": "Relaunch" },
            "associations": {
                "contacts": { "results": [ { "id": "c1", "type": "quote_to_contact" } ] }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let quote = client_for(&server)
        .get_quote("q1", &[AssociationKind::Contact, AssociationKind::Company])
        .await
        .unwrap()
        .expect("quote should exist");

    assert_eq!(quote.id, "q1");
    assert_eq!(quote.fields["properties"]["hs_title"], "Relaunch");
    assert_eq!(quote.association_ids(AssociationKind::Contact), vec!["c1"]);
    assert!(quote.association_ids(AssociationKind::Company).is_empty());
}

#[tokio::test]
async fn get_quote_maps_404_and_empty_body_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crm/v3/objects/quotes/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "error",
            "message": "Object not found.  objectId are usually numeric.",
            "category": "OBJECT_NOT_FOUND"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/crm/v3/objects/quotes/empty"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);

    assert!(client.get_quote("missing", &[]).await.unwrap().is_none());
    assert!(client.get_quote("empty", &[]).await.unwrap().is_none());
}

#[tokio::test]
async fn get_quote_reports_api_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crm/v3/objects/quotes/q1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error",
            "message": "Authentication credentials not found.",
            "category": "INVALID_AUTHENTICATION"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).get_quote("q1", &[]).await.unwrap_err();

    match err {
        HubSpotError::ApiError {
            status_code,
            message,
        } => {
            assert_eq!(status_code, 401);
            assert_eq!(message, "Authentication credentials not found.");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn contact_and_company_lookups_use_object_paths() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crm/v3/objects/contacts/c1"))
        .and(header("authorization", "Bearer pat-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c1",
            "properties": { "email": "ada@example.com" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/crm/v3/objects/companies/co1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "co1",
            "properties": { "name": "Analytical Engines Ltd" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let contact = client.get_contact("c1").await.unwrap();
    let company = client.get_company("co1").await.unwrap();

    assert_eq!(contact.fields["properties"]["email"], "ada@example.com");
    assert_eq!(company.id, "co1");
}

#[tokio::test]
async fn missing_contact_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crm/v3/objects/contacts/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_contact("gone").await.unwrap_err();

    assert!(matches!(
        err,
        HubSpotError::ApiError {
            status_code: 404,
            ..
        }
    ));
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crm/v3/objects/companies/co1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_company("co1").await.unwrap_err();

    assert!(matches!(err, HubSpotError::ParseError(_)));
}
