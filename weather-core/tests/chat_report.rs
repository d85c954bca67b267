//! Integration tests for report generation against a mocked chat backend.

use serde_json::json;
use weatherx_core::{
    ChatReportGenerator, InsightError, ReportGenerator,
    insight::{ChatClient, ChatMessage},
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(text: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": text },
                "finish_reason": "stop"
            }
        ]
    })
}

fn client(server: &MockServer) -> ChatClient {
    ChatClient::new(
        format!("{}/openai/v1", server.uri()),
        "LLM_KEY".into(),
        "test-model".into(),
    )
}

#[tokio::test]
async fn complete_returns_trimmed_first_choice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .and(header("authorization", "Bearer LLM_KEY"))
        .and(body_partial_json(json!({ "model": "test-model", "temperature": 0.5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("  hello \n")))
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server).complete(&[ChatMessage::user("hi")], 0.5).await.unwrap();

    assert_eq!(text, "hello");
}

#[tokio::test]
async fn empty_choices_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = client(&server).complete(&[ChatMessage::user("hi")], 0.5).await.unwrap_err();

    assert!(matches!(err, InsightError::EmptyResponse));
}

#[tokio::test]
async fn error_status_keeps_response_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = client(&server).complete(&[ChatMessage::user("hi")], 0.5).await.unwrap_err();

    match err {
        InsightError::Status { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_success_body_is_a_json_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = client(&server).complete(&[ChatMessage::user("hi")], 0.5).await.unwrap_err();

    assert!(matches!(err, InsightError::Json(_)));
}

#[tokio::test]
async fn report_makes_one_call_per_section_plus_merge() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .and(body_partial_json(json!({ "temperature": 0.4 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("- mild and dry")))
        .expect(3)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .and(body_partial_json(json!({ "temperature": 0.6 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "**Today's weather:**\n- Mild and dry.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let forecast = json!({
        "timelines": {
            "minutely": [ { "values": { "temperature": 9.0 } } ],
            "hourly": [ { "values": { "temperature": 10.0 } } ],
            "daily": [ { "values": { "temperatureAvg": 11.0 } } ]
        }
    });

    let report = ChatReportGenerator::new(client(&server)).generate(&forecast).await.unwrap();

    assert_eq!(report, "**Today's weather:**\n- Mild and dry.");

    let requests = server.received_requests().await.unwrap();
    let merge: serde_json::Value = serde_json::from_slice(&requests[3].body).unwrap();
    let merge_input = merge["messages"][1]["content"].as_str().unwrap();
    assert!(merge_input.contains("## Minutely Insights\n- mild and dry"));
    assert!(merge_input.contains("## Daily Insights\n- mild and dry"));
    assert!(merge["messages"][0]["content"].as_str().unwrap().contains("**Weather Outlook:**"));
}

#[tokio::test]
async fn backend_failure_aborts_report() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "error": { "message": "Invalid API Key" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let forecast = json!({ "timelines": { "hourly": [], "daily": [] } });
    let err = ChatReportGenerator::new(client(&server)).generate(&forecast).await.unwrap_err();

    assert!(matches!(err, InsightError::Status { status: 401, .. }));
}
