//! Data source reads against a mock Runscope API.

use serde_json::{json, Value};
use terraform_provider_runscope::{Provider, ProviderErrorKind, ResourceData};
use runscope_api::RunscopeClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "data": data, "error": null, "meta": { "status": "success" }
    }))
}

fn config(attributes: Value) -> ResourceData {
    ResourceData::new(attributes.as_object().cloned().unwrap_or_default())
}

async fn setup() -> (MockServer, RunscopeClient, Provider) {
    let server = MockServer::start().await;
    let client = RunscopeClient::new("token", &server.uri()).unwrap();
    (server, client, Provider::new())
}

fn integrations() -> Value {
    json!([
        { "uuid": "i1", "type": "slack", "description": "alerts channel" },
        { "uuid": "i2", "type": "pagerduty", "description": "on call" },
        { "uuid": "i3", "type": "slack", "description": "deploys channel" }
    ])
}

// ── Buckets ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_bucket_by_key() {
    let (server, client, provider) = setup().await;
    Mock::given(method("GET"))
        .and(path("/buckets/bkt1"))
        .respond_with(ok(json!({
            "key": "bkt1", "name": "main", "team": { "id": "team-1", "name": "Team" },
            "default": true, "verify_ssl": true
        })))
        .mount(&server)
        .await;

    let data = provider
        .read_data_source(&client, "runscope_bucket", config(json!({"key": "bkt1"})))
        .await
        .unwrap();
    assert_eq!(data.id(), "bkt1");
    assert_eq!(data.get_str("name"), "main");
    assert_eq!(data.get_str("team_uuid"), "team-1");
    assert_eq!(data.attributes["default"], json!(true));
}

#[tokio::test]
async fn test_buckets_filtered_by_name() {
    let (server, client, provider) = setup().await;
    Mock::given(method("GET"))
        .and(path("/buckets"))
        .respond_with(ok(json!([
            { "key": "k1", "name": "a" },
            { "key": "k2", "name": "b" },
            { "key": "k3", "name": "a" },
            { "key": "k4", "name": "c" }
        ])))
        .mount(&server)
        .await;

    let data = provider
        .read_data_source(
            &client,
            "runscope_buckets",
            config(json!({"filter": [{ "name": "name", "values": ["a", "b"] }]})),
        )
        .await
        .unwrap();
    assert!(!data.is_absent());
    assert_eq!(data.attributes["keys"], json!(["k1", "k2", "k3"]));
}

#[tokio::test]
async fn test_buckets_without_filter_lists_everything() {
    let (server, client, provider) = setup().await;
    Mock::given(method("GET"))
        .and(path("/buckets"))
        .respond_with(ok(json!([{ "key": "k1", "name": "a" }, { "key": "k2", "name": "b" }])))
        .mount(&server)
        .await;

    let data = provider
        .read_data_source(&client, "runscope_buckets", config(json!({})))
        .await
        .unwrap();
    assert_eq!(data.attributes["keys"], json!(["k1", "k2"]));
}

// ── Integrations ────────────────────────────────────────────────────

#[tokio::test]
async fn test_integration_first_match_of_type() {
    let (server, client, provider) = setup().await;
    Mock::given(method("GET"))
        .and(path("/teams/team-1/integrations"))
        .respond_with(ok(integrations()))
        .mount(&server)
        .await;

    let data = provider
        .read_data_source(
            &client,
            "runscope_integration",
            config(json!({
                "team_uuid": "team-1", "type": "slack",
                "filter": [{ "name": "description", "values": ["deploys channel"] }]
            })),
        )
        .await
        .unwrap();
    assert_eq!(data.id(), "i3");
    assert_eq!(data.get_str("description"), "deploys channel");
}

#[tokio::test]
async fn test_integration_not_found() {
    let (server, client, provider) = setup().await;
    Mock::given(method("GET"))
        .and(path("/teams/team-1/integrations"))
        .respond_with(ok(integrations()))
        .mount(&server)
        .await;

    let err = provider
        .read_data_source(
            &client,
            "runscope_integration",
            config(json!({"team_uuid": "team-1", "type": "webhook"})),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::NotFound);
    assert_eq!(err.message, "Unable to locate any integrations with the type: webhook");
}

#[tokio::test]
async fn test_integrations_filtered_by_type() {
    let (server, client, provider) = setup().await;
    Mock::given(method("GET"))
        .and(path("/teams/team-1/integrations"))
        .respond_with(ok(integrations()))
        .mount(&server)
        .await;

    let data = provider
        .read_data_source(
            &client,
            "runscope_integrations",
            config(json!({
                "team_uuid": "team-1",
                "filter": [{ "name": "type", "values": ["slack"] }]
            })),
        )
        .await
        .unwrap();
    assert_eq!(data.attributes["ids"], json!(["i1", "i3"]));
}

// ── Remote agents ───────────────────────────────────────────────────

#[tokio::test]
async fn test_remote_agents_listed() {
    let (server, client, provider) = setup().await;
    Mock::given(method("GET"))
        .and(path("/teams/team-1/agents"))
        .respond_with(ok(json!([
            { "agent_id": "a1", "name": "dc-east", "version": "1.2.0" }
        ])))
        .mount(&server)
        .await;

    let data = provider
        .read_data_source(&client, "runscope_remote_agents", config(json!({"team_uuid": "team-1"})))
        .await
        .unwrap();
    assert_eq!(
        data.attributes["remote_agents"],
        json!([{ "id": "a1", "name": "dc-east", "version": "1.2.0" }])
    );
}

#[tokio::test]
async fn test_missing_required_attribute_sends_nothing() {
    let (server, client, provider) = setup().await;
    Mock::given(method("GET"))
        .respond_with(ok(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider
        .read_data_source(&client, "runscope_remote_agents", config(json!({})))
        .await
        .unwrap_err();
    assert_eq!(err.attribute.as_deref(), Some("team_uuid"));
}
