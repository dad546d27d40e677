//! HTTP gateway tests against a mock chat-completions server

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use inspector_core::{
    ApplyResult, ChatCompletionsGateway, CompletionGateway, CompletionRequest, Focus,
    GatewayError, HistoryEntry, Role, Rule, RuleInspector, APOLOGY,
};

fn request() -> CompletionRequest {
    CompletionRequest::new(
        "test-model",
        vec![
            HistoryEntry::new(Role::System, "be brief"),
            HistoryEntry::new(Role::User, "what is rule 1?"),
        ],
    )
}

fn gateway(server: &MockServer, key: Option<&str>) -> ChatCompletionsGateway {
    ChatCompletionsGateway::new(
        format!("{}/v1/", server.uri()),
        key.map(String::from),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn reply(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" },
            { "index": 1, "message": { "role": "assistant", "content": "ignored" }, "finish_reason": "stop" }
        ]
    })
}

#[tokio::test]
async fn test_posts_chat_completions_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("Rule 1 allows HTTPS.")))
        .expect(1)
        .mount(&server)
        .await;

    let text = gateway(&server, None).complete(&request()).await.unwrap();
    assert_eq!(text, "Rule 1 allows HTTPS.");

    let received = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["model"], "test-model");
    assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    assert_eq!(
        body["messages"],
        json!([
            { "role": "system", "content": "be brief" },
            { "role": "user", "content": "what is rule 1?" }
        ])
    );
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let text = gateway(&server, Some("sk-test")).complete(&request()).await.unwrap();
    assert_eq!(text, "ok");
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = gateway(&server, None).complete(&request()).await.unwrap_err();
    match err {
        GatewayError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "overloaded");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let gateway = gateway(&server, None);
    let no_choices = gateway.complete(&request()).await.unwrap_err();
    assert!(matches!(no_choices, GatewayError::Malformed(_)));

    let not_json = gateway.complete(&request()).await.unwrap_err();
    assert!(matches!(not_json, GatewayError::Malformed(_)));
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(reply("too late"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let gateway =
        ChatCompletionsGateway::new(server.uri(), None, Duration::from_millis(50)).unwrap();
    let err = gateway.complete(&request()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Timeout));
}

#[tokio::test]
async fn test_inspector_absorbs_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let rules = vec![Rule::new("r1", "Allow DNS", json!({ "port": 53 }))];
    let mut inspector = RuleInspector::new(
        Arc::new(gateway(&server, None)),
        "test-model",
        rules,
        Vec::new(),
        Focus::Rule(0),
    );

    let result = inspector.send("hello?").await.unwrap();
    assert!(matches!(result, ApplyResult::Apologized(_)));
    assert_eq!(inspector.conversation().last_message().unwrap().text, APOLOGY);
    assert!(!inspector.is_loading());
}
