//! OpenAI provider wire-format tests against a mock HTTP server.

mod common;

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use almanac::error::AlmanacError;
use almanac::provider::openai::OpenAiProvider;
use almanac::provider::{CompletionRequest, ModelProvider, ModelTurn, ToolDefinition};
use almanac::types::ModelMessage;

use common::test_config;

fn provider_for(server: &MockServer) -> OpenAiProvider {
    let config = test_config()
        .with_api_key(Some("sk-test".into()))
        .with_base_url(Some(server.uri()));
    OpenAiProvider::new(&config)
}

fn request(tools: Vec<ToolDefinition>) -> CompletionRequest {
    CompletionRequest {
        messages: vec![
            ModelMessage::system("You are helpful."),
            ModelMessage::user("Tell me about Marie Curie"),
        ],
        tools,
    }
}

fn lookup_tool() -> ToolDefinition {
    ToolDefinition {
        name: "fetch_wikipedia_info".into(),
        description: "Search Wikipedia".into(),
        parameters: json!({
            "type": "object",
            "properties": { "query": { "type": "string" } },
            "required": ["query"]
        }),
    }
}

#[tokio::test]
async fn plain_text_response_maps_to_text_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_string_contains("Marie Curie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": { "role": "assistant", "content": "She was a physicist." }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let turn = provider_for(&server)
        .complete(&request(vec![lookup_tool()]))
        .await
        .unwrap();
    assert_eq!(turn, ModelTurn::Text("She was a physicist.".into()));
}

#[tokio::test]
async fn tool_call_response_maps_to_tool_calls_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "fetch_wikipedia_info",
                            "arguments": "{\"query\": \"Marie Curie\"}"
                        }
                    }]
                }
            }]
        })))
        .mount(&server)
        .await;

    let turn = provider_for(&server)
        .complete(&request(vec![lookup_tool()]))
        .await
        .unwrap();

    let ModelTurn::ToolCalls { text, calls } = turn else {
        panic!("expected tool calls, got {turn:?}");
    };
    assert_eq!(text, "");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, "call_abc");
    assert_eq!(calls[0].name, "fetch_wikipedia_info");
    assert_eq!(calls[0].argument, "Marie Curie");
}

#[tokio::test]
async fn request_advertises_tool_definitions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("fetch_wikipedia_info"))
        .and(body_string_contains("\"temperature\":0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "ok" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    provider_for(&server)
        .complete(&request(vec![lookup_tool()]))
        .await
        .unwrap();
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string("{\"error\": \"invalid api key\"}"),
        )
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .complete(&request(vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, AlmanacError::Authentication(_)));
}

#[tokio::test]
async fn server_error_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .complete(&request(vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, AlmanacError::Api { status: 500, .. }));
}
