use std::time::Duration;

use jarvis_llm::{jarvis_messages, ChatCompletionProvider, LLMError, OpenAIChatClient};
use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn client_for(server: &MockServer) -> OpenAIChatClient {
    OpenAIChatClient::new("sk-test")
        .with_base_url(server.uri())
        .with_client(reqwest::Client::builder().no_proxy().build().unwrap())
}

#[tokio::test]
async fn returns_first_choice_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4",
            "stream": false,
            "messages": [
                {
                    "role": "system",
                    "content": "You are Jarvis, an autonomous AI execution assistant."
                },
                {"role": "user", "content": "What's the weather?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Sunny, sir."},
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .complete(&jarvis_messages("What's the weather?"))
        .await
        .unwrap();
    assert_eq!(reply, "Sunny, sir.");
}

#[tokio::test]
async fn non_success_status_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete(&jarvis_messages("hi"))
        .await
        .unwrap_err();
    match err {
        LLMError::Api { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn empty_choices_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete(&jarvis_messages("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::MalformedResponse(_)));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .with_timeout(Duration::from_millis(100))
        .complete(&jarvis_messages("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::Timeout), "got {err:?}");
}
