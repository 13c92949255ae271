//! Resource lifecycles against a mock Runscope API.

use serde_json::{json, Value};
use terraform_provider_runscope::{Provider, ProviderErrorKind, ResourceData};
use runscope_api::RunscopeClient;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn envelope(data: Value) -> Value {
    json!({ "data": data, "error": null, "meta": { "status": "success" } })
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(envelope(data))
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "data": null,
        "error": { "status": 404, "message": "Not Found" },
        "meta": { "status": "error" }
    }))
}

fn data(id: &str, attributes: Value) -> ResourceData {
    let mut d = ResourceData::new(attributes.as_object().cloned().unwrap_or_default());
    d.set_id(id);
    d
}

async fn setup() -> (MockServer, RunscopeClient, Provider) {
    let server = MockServer::start().await;
    let client = RunscopeClient::new("token", &server.uri()).unwrap();
    (server, client, Provider::new())
}

// ── Buckets ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_bucket_create_reads_back_computed_fields() {
    let (server, client, provider) = setup().await;
    let bucket = json!({
        "key": "bkt1", "name": "my-bucket", "auth_token": "secret",
        "default": false, "verify_ssl": true,
        "trigger_url": "https://api.runscope.com/radar/bucket/bkt1/trigger",
        "team": { "id": "team-1", "name": "Team" }
    });
    Mock::given(method("POST"))
        .and(path("/buckets"))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(bucket.clone())))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/buckets/bkt1"))
        .respond_with(ok(bucket))
        .mount(&server)
        .await;

    let state = provider
        .create(&client, "runscope_bucket", data("", json!({"name": "my-bucket", "team_uuid": "team-1"})))
        .await
        .unwrap();
    assert_eq!(state.id(), "bkt1");
    assert_eq!(state.get_str("team_uuid"), "team-1");
    assert_eq!(state.get_str("auth_token"), "secret");
    assert_eq!(state.attributes["verify_ssl"], json!(true));
}

#[tokio::test]
async fn test_bucket_import_missing_bucket() {
    let (server, client, provider) = setup().await;
    Mock::given(method("GET"))
        .and(path("/buckets/gone"))
        .respond_with(not_found())
        .mount(&server)
        .await;

    let err = provider.import(&client, "runscope_bucket", "gone").await.unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::Import);
    assert_eq!(err.message, "Couldn't find bucket: gone");
}

#[tokio::test]
async fn test_bucket_update_unsupported() {
    let (_server, client, provider) = setup().await;
    let prior = data("k", json!({"name": "a", "team_uuid": "t"}));
    let err = provider
        .update(&client, "runscope_bucket", &prior, prior.clone())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::Unsupported);
}

// ── Tests ───────────────────────────────────────────────────────────

fn test_body(default_environment_id: &str) -> Value {
    json!({
        "id": "t1", "name": "smoke", "description": "checks",
        "default_environment_id": default_environment_id,
        "steps": [{ "id": "s1" }, { "id": "s2" }],
        "created_at": 1_600_000_000,
        "created_by": { "id": "u1", "name": "Dev", "email": "dev@example.com" },
        "trigger_url": "https://api.runscope.com/radar/t1/trigger"
    })
}

#[tokio::test]
async fn test_test_create_with_default_environment() {
    let (server, client, provider) = setup().await;
    Mock::given(method("GET"))
        .and(path("/buckets/b1/environments/e1"))
        .respond_with(ok(json!({ "id": "e1", "name": "shared" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/buckets/b1/tests"))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(test_body(""))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/buckets/b1/tests/t1"))
        .and(body_partial_json(json!({ "default_environment_id": "e1" })))
        .respond_with(ok(test_body("e1")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/buckets/b1/tests/t1"))
        .respond_with(ok(test_body("e1")))
        .mount(&server)
        .await;

    let state = provider
        .create(
            &client,
            "runscope_test",
            data("", json!({
                "bucket_id": "b1", "name": "smoke", "description": "checks",
                "default_environment_id": "e1"
            })),
        )
        .await
        .unwrap();
    assert_eq!(state.id(), "t1");
    assert_eq!(state.get_str("default_environment_id"), "e1");
    assert_eq!(state.attributes["steps"], json!(["s1", "s2"]));
    assert_eq!(state.get_str("created_at"), "Sun, 13 Sep 2020 12:26:40 UTC");
    assert_eq!(state.attributes["created_by"][0]["email"], json!("dev@example.com"));
}

#[tokio::test]
async fn test_test_read_not_found_clears_state() {
    let (server, client, provider) = setup().await;
    Mock::given(method("GET"))
        .and(path("/buckets/b1/tests/t1"))
        .respond_with(not_found())
        .mount(&server)
        .await;

    let state = provider
        .read(&client, "runscope_test", data("t1", json!({"bucket_id": "b1"})))
        .await
        .unwrap();
    assert!(state.is_absent());
}

#[tokio::test]
async fn test_test_delete_not_found_is_an_error() {
    let (server, client, provider) = setup().await;
    Mock::given(method("DELETE"))
        .and(path("/buckets/b1/tests/t1"))
        .respond_with(not_found())
        .mount(&server)
        .await;

    let err = provider
        .delete(&client, "runscope_test", &data("t1", json!({"bucket_id": "b1"})))
        .await
        .unwrap_err();
    assert_eq!(err.message, "Error deleting test: 404 Not Found");
}

#[tokio::test]
async fn test_test_import_of_missing_test_fails() {
    let (server, client, provider) = setup().await;
    Mock::given(method("GET"))
        .and(path("/buckets/b1/tests/t1"))
        .respond_with(not_found())
        .mount(&server)
        .await;

    let err = provider.import(&client, "runscope_test", "b1/t1").await.unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::Import);
}

// ── Environments ────────────────────────────────────────────────────

#[tokio::test]
async fn test_environment_parent_without_test_sends_nothing() {
    let (server, client, provider) = setup().await;
    Mock::given(method("POST"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider
        .create(
            &client,
            "runscope_environment",
            data("", json!({"bucket_id": "b1", "name": "child", "parent_environment_id": "p1"})),
        )
        .await
        .unwrap_err();
    assert_eq!(err.message, "parent_environment_id could be set only if test_id defined");
}

#[tokio::test]
async fn test_environment_read_keeps_email_unset_for_defaults() {
    let (server, client, provider) = setup().await;
    Mock::given(method("GET"))
        .and(path("/buckets/b1/tests/t1/environments/e1"))
        .respond_with(ok(json!({
            "id": "e1", "name": "env", "verify_ssl": true,
            "integrations": [{ "id": "i1", "integration_type": "slack" }],
            "regions": ["us1"],
            "emails": { "notify_all": false, "notify_on": "", "notify_threshold": 0, "recipients": [] },
            "initial_variables": null
        })))
        .mount(&server)
        .await;

    let state = provider
        .read(
            &client,
            "runscope_environment",
            data("e1", json!({"bucket_id": "b1", "test_id": "t1", "name": "env"})),
        )
        .await
        .unwrap();
    assert!(state.get("email").is_none());
    assert_eq!(state.attributes["integrations"], json!(["i1"]));
    assert_eq!(state.attributes["initial_variables"], json!({}));
    assert_eq!(state.get_str("test_id"), "t1");
}

#[tokio::test]
async fn test_environment_update_sends_emails() {
    let (server, client, provider) = setup().await;
    let env = json!({
        "id": "e1", "name": "env", "verify_ssl": true,
        "emails": {
            "notify_all": false, "notify_on": "failures", "notify_threshold": 1,
            "recipients": [{ "id": "r1", "name": "Dev", "email": "dev@example.com" }]
        }
    });
    Mock::given(method("PUT"))
        .and(path("/buckets/b1/environments/e1"))
        .and(body_partial_json(json!({
            "emails": { "notify_on": "failures", "recipients": [{ "id": "r1" }] }
        })))
        .respond_with(ok(env.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/buckets/b1/environments/e1"))
        .respond_with(ok(env))
        .mount(&server)
        .await;

    let prior = data("e1", json!({"bucket_id": "b1", "name": "env"}));
    let planned = data("", json!({
        "bucket_id": "b1", "name": "env",
        "email": [{ "notify_on": "failures", "notify_threshold": 1, "recipient": [{ "id": "r1" }] }]
    }));
    let state = provider
        .update(&client, "runscope_environment", &prior, planned)
        .await
        .unwrap();
    assert_eq!(state.attributes["email"][0]["recipient"][0]["name"], json!("Dev"));
}

// ── Schedules ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_schedule_interval_normalized_on_read() {
    let (server, client, provider) = setup().await;
    Mock::given(method("POST"))
        .and(path("/buckets/b1/tests/t1/schedules"))
        .and(body_partial_json(json!({ "interval": "1d", "environment_id": "e1" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!({ "id": "sch1" }))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/buckets/b1/tests/t1/schedules/sch1"))
        .respond_with(ok(json!({
            "id": "sch1", "environment_id": "e1", "interval": "1.0d",
            "note": "daily", "exported_at": 0
        })))
        .mount(&server)
        .await;

    let state = provider
        .create(
            &client,
            "runscope_schedule",
            data("", json!({"bucket_id": "b1", "test_id": "t1", "environment_id": "e1", "interval": "1d"})),
        )
        .await
        .unwrap();
    assert_eq!(state.get_str("interval"), "1d");
    assert_eq!(state.get_str("exported_at"), "");
    assert_eq!(state.get_str("note"), "daily");
}

// ── Steps ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_step_create_takes_last_step() {
    let (server, client, provider) = setup().await;
    Mock::given(method("POST"))
        .and(path("/buckets/b1/tests/t1/steps"))
        .and(body_partial_json(json!({
            "assertions": [{ "source": "response_status", "comparison": "equal_number", "value": "200" }]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!([
            { "id": "old", "step_type": "pause" },
            { "id": "new", "step_type": "request" }
        ]))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/buckets/b1/tests/t1/steps/new"))
        .respond_with(ok(json!({
            "id": "new", "step_type": "request", "method": "GET", "url": "https://example.com",
            "assertions": [{ "source": "response_status", "comparison": "equal_number", "value": 200 }],
            "headers": { "Accept": ["application/json"] },
            "auth": {}
        })))
        .mount(&server)
        .await;

    let state = provider
        .create(
            &client,
            "runscope_step",
            data("", json!({
                "bucket_id": "b1", "test_id": "t1", "step_type": "request",
                "method": "GET", "url": "https://example.com",
                "assertion": [{ "source": "response_status", "comparison": "equal_number", "value": "200" }]
            })),
        )
        .await
        .unwrap();
    assert_eq!(state.id(), "new");
    assert_eq!(state.attributes["assertion"][0]["value"], json!("200"));
    assert_eq!(
        state.attributes["header"],
        json!([{ "header": "Accept", "value": "application/json" }])
    );
    assert!(state.get("auth").is_none());
}

async fn mount_two_step_test(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/buckets/b1/tests/t1"))
        .respond_with(ok(json!({ "id": "t1", "steps": [{ "id": "A" }, { "id": "B" }] })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/buckets/b1/tests/t1/steps/B"))
        .respond_with(ok(json!({ "id": "B", "step_type": "pause", "duration": 5 })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_step_import_by_position() {
    let (server, client, provider) = setup().await;
    mount_two_step_test(&server).await;

    let state = provider.import(&client, "runscope_step", "b1/t1#2").await.unwrap();
    assert_eq!(state.id(), "B");
    assert_eq!(state.get_str("bucket_id"), "b1");
    assert_eq!(state.get_str("test_id"), "t1");
    assert_eq!(state.attributes["duration"], json!(5));
}

#[tokio::test]
async fn test_step_import_position_out_of_range() {
    let (server, client, provider) = setup().await;
    mount_two_step_test(&server).await;

    let err = provider.import(&client, "runscope_step", "b1/t1#3").await.unwrap_err();
    assert_eq!(err.message, "test t1 contains only 2 steps");
}

#[tokio::test]
async fn test_step_import_zero_position_sends_nothing() {
    let (server, client, provider) = setup().await;
    Mock::given(method("GET"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider.import(&client, "runscope_step", "b1/t1#0").await.unwrap_err();
    assert_eq!(err.message, "step_position should be a positive integer number");
}

#[tokio::test]
async fn test_step_import_test_lookup_failure() {
    let (server, client, provider) = setup().await;
    Mock::given(method("GET"))
        .and(path("/buckets/b1/tests/t1"))
        .respond_with(not_found())
        .mount(&server)
        .await;

    let err = provider.import(&client, "runscope_step", "b1/t1#1").await.unwrap_err();
    assert_eq!(err.message, "Couldn't read test: 404 Not Found");
}

// ── Repeated reads ──────────────────────────────────────────────────

async fn read_twice(client: &RunscopeClient, provider: &Provider, type_name: &str, state: ResourceData) {
    let first = provider.read(client, type_name, state).await.unwrap();
    assert!(!first.is_absent());
    let second = provider.read(client, type_name, first.clone()).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_step_read_is_stable() {
    let (server, client, provider) = setup().await;
    Mock::given(method("GET"))
        .and(path("/buckets/b1/tests/t1/steps/s1"))
        .respond_with(ok(json!({
            "id": "s1", "step_type": "request", "method": "POST", "url": "https://example.com",
            "headers": { "Accept": ["application/json", "text/plain"], "X-Trace": ["1"] },
            "form": { "tag": ["a", "b"] },
            "assertions": [{ "source": "response_status", "comparison": "equal_number", "value": 200 }],
            "variables": [{ "name": "token", "property": "data.token", "source": "response_json" }],
            "auth": { "username": "u", "password": "p", "auth_type": "basic" },
            "scripts": null
        })))
        .expect(2)
        .mount(&server)
        .await;

    read_twice(
        &client,
        &provider,
        "runscope_step",
        data("s1", json!({"bucket_id": "b1", "test_id": "t1", "step_type": "request"})),
    )
    .await;
}

#[tokio::test]
async fn test_environment_read_is_stable() {
    let (server, client, provider) = setup().await;
    Mock::given(method("GET"))
        .and(path("/buckets/b1/environments/e1"))
        .respond_with(ok(json!({
            "id": "e1", "name": "env", "verify_ssl": true,
            "initial_variables": { "base": "https://example.com" },
            "integrations": [{ "id": "i1" }],
            "regions": ["us1", "eu1"],
            "remote_agents": [{ "name": "dc-east", "uuid": "a1" }],
            "emails": {
                "notify_all": false, "notify_on": "threshold", "notify_threshold": 2,
                "recipients": [{ "id": "r1", "name": "Dev", "email": "dev@example.com" }]
            }
        })))
        .expect(2)
        .mount(&server)
        .await;

    read_twice(
        &client,
        &provider,
        "runscope_environment",
        data("e1", json!({"bucket_id": "b1", "name": "env"})),
    )
    .await;
}

#[tokio::test]
async fn test_schedule_read_is_stable() {
    let (server, client, provider) = setup().await;
    Mock::given(method("GET"))
        .and(path("/buckets/b1/tests/t1/schedules/sch1"))
        .respond_with(ok(json!({
            "id": "sch1", "environment_id": "e1", "interval": "1.0h",
            "note": "hourly", "exported_at": 1_600_000_000
        })))
        .expect(2)
        .mount(&server)
        .await;

    read_twice(
        &client,
        &provider,
        "runscope_schedule",
        data("sch1", json!({"bucket_id": "b1", "test_id": "t1"})),
    )
    .await;
}
