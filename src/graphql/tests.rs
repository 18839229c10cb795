use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::error::BlueError;

fn settings(server: &MockServer) -> ClientSettings {
    ClientSettings {
        endpoint: format!("{}/graphql", server.uri()),
        credentials: Credentials {
            token_id: "token-id".into(),
            token_secret: "token-secret".into(),
        },
        timeout: Duration::from_secs(5),
        full_response: false,
    }
}

#[tokio::test]
async fn posts_query_with_auth_and_company_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("X-Bloo-Token-ID", "token-id"))
        .and(header("X-Bloo-Token-Secret", "token-secret"))
        .and(header("X-Bloo-Company-ID", "company-1"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({ "query": "query Q { x }", "variables": { "a": 1 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "x": 1 } })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BlueClient::new(&settings(&server)).unwrap();
    let mut variables = serde_json::Map::new();
    variables.insert("a".into(), json!(1));
    let data = client
        .execute(
            GraphQlRequest::new("  query Q { x }  ")
                .company("company-1")
                .variables(variables),
            None,
        )
        .await
        .unwrap();

    assert_eq!(data, json!({ "x": 1 }));
}

#[tokio::test]
async fn sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header_exists("User-Agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BlueClient::new(&settings(&server)).unwrap();
    client.execute(GraphQlRequest::new("{ x }"), None).await.unwrap();
}

#[tokio::test]
async fn graphql_errors_fail_even_with_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "x": 1 },
            "errors": [{ "message": "First" }, { "message": "Second" }]
        })))
        .mount(&server)
        .await;

    let client = BlueClient::new(&settings(&server)).unwrap();
    let err = client
        .execute(GraphQlRequest::new("{ x }"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, BlueError::GraphQl(_)));
    assert_eq!(err.to_string(), "GraphQL Error: First, Second");
}

#[tokio::test]
async fn non_success_status_is_a_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = BlueClient::new(&settings(&server)).unwrap();
    let err = client
        .execute(GraphQlRequest::new("{ x }"), None)
        .await
        .unwrap_err();

    match err {
        BlueError::Status { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body, "bad gateway");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": {} }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = BlueClient::new(&settings(&server)).unwrap();
    let err = client
        .execute(
            GraphQlRequest::new("{ x }").timeout(Some(Duration::from_millis(50))),
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, BlueError::Transport(_)));
}

#[tokio::test]
async fn full_response_setting_returns_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "x": 1 } })))
        .mount(&server)
        .await;

    let mut settings = settings(&server);
    settings.full_response = true;
    let client = BlueClient::new(&settings).unwrap();
    let full = client.execute(GraphQlRequest::new("{ x }"), None).await.unwrap();

    assert_eq!(full, json!({ "data": { "x": 1 } }));
}
