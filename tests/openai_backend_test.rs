//! Integration tests for the OpenAI-compatible backend against a mock server.

use mockito::{Matcher, Server};
use prompt_bandit::adapters::backends::{OpenAiBackend, OpenAiConfig};
use prompt_bandit::domain::models::{Params, Usage};
use prompt_bandit::{GenerationBackend, GenerationError};

fn backend_for(server: &Server) -> OpenAiBackend {
    let config = OpenAiConfig::default()
        .with_api_key("test-api-key")
        .with_base_url(server.url());
    OpenAiBackend::new(config).expect("Failed to create backend")
}

fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49 }
    })
    .to_string()
}

#[tokio::test]
async fn test_generate_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer test-api-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o-mini",
                "temperature": 0.2,
                "top_p": 1.0,
                "max_tokens": 256
            })),
            Matcher::Regex(r#""role":"system""#.to_string()),
            Matcher::Regex(r#""content":"Question: Capital of France\?""#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body("  Final: Paris\n"))
        .create_async()
        .await;

    let backend = backend_for(&server);
    let generation = backend
        .generate("Question: Capital of France?", &Params::new(0.2, 256, 1.0))
        .await
        .expect("generation failed");

    assert_eq!(generation.output, "Final: Paris");
    assert_eq!(generation.usage, Usage::new(42, 7));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_usage_counts_as_zero() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"content":"Final: 44"}}]}"#)
        .create_async()
        .await;

    let generation = backend_for(&server)
        .generate("Compute 13 + 31", &Params::default())
        .await
        .unwrap();
    assert_eq!(generation.output, "Final: 44");
    assert_eq!(generation.usage.total_tokens(), 0);
}

#[tokio::test]
async fn test_error_status_is_api_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(429)
        .with_body(r#"{"error":{"message":"Rate limit reached"}}"#)
        .create_async()
        .await;

    let err = backend_for(&server)
        .generate("hi", &Params::default())
        .await
        .unwrap_err();
    match err {
        GenerationError::Api { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("Rate limit"));
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = backend_for(&server)
        .generate("hi", &Params::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_empty_choices_is_invalid_response() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let err = backend_for(&server)
        .generate("hi", &Params::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_request_failed() {
    let config = OpenAiConfig::default()
        .with_api_key("k")
        .with_base_url("http://127.0.0.1:9");
    let err = OpenAiBackend::new(config)
        .unwrap()
        .generate("hi", &Params::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::RequestFailed(_)));
}
