//! OpenAI Chat Completions API provider.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::AlmanacConfig;
use crate::error::AlmanacError;
use crate::types::{ContentPart, ModelMessage, Role, ToolCall};

use super::http::{bearer_headers, shared_client, status_to_error};
use super::{argument_text, CompletionRequest, ModelProvider, ModelTurn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiProvider {
    model: String,
    temperature: f64,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(config: &AlmanacConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        let messages = request
            .messages
            .iter()
            .flat_map(message_to_openai)
            .collect::<Vec<_>>();

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
        });

        if !request.tools.is_empty() {
            let tool_defs: Vec<serde_json::Value> = request
                .tools
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        }
                    })
                })
                .collect();
            body.as_object_mut()
                .expect("body is an object")
                .insert("tools".into(), tool_defs.into());
        }

        body
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<ModelTurn, AlmanacError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AlmanacError::Authentication("OPENAI_API_KEY is not set".into())
        })?;

        let body = self.build_request_body(request);
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = %self.model, messages = request.messages.len(), "calling completion API");

        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: OpenAiChatResponse = resp.json().await?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AlmanacError::api(200, "No choices in OpenAI response"))?;

        let text = choice.message.content.unwrap_or_default();
        let calls: Vec<ToolCall> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| {
                let arguments: serde_json::Value = serde_json::from_str(&tc.function.arguments)
                    .unwrap_or(serde_json::Value::String(tc.function.arguments));
                ToolCall {
                    id: tc.id,
                    name: tc.function.name,
                    argument: argument_text(&arguments),
                }
            })
            .collect();

        if calls.is_empty() {
            Ok(ModelTurn::Text(text))
        } else {
            Ok(ModelTurn::ToolCalls { text, calls })
        }
    }
}

/// Convert one conversation message into OpenAI wire messages.
///
/// An assistant message with tool-call parts becomes a single message with
/// a `tool_calls` array; a tool-result message maps part-by-part onto
/// `role: tool` messages keyed by `tool_call_id`.
fn message_to_openai(message: &ModelMessage) -> Vec<serde_json::Value> {
    match message.role {
        Role::System => vec![serde_json::json!({
            "role": "system",
            "content": message.text(),
        })],
        Role::User => vec![serde_json::json!({
            "role": "user",
            "content": message.text(),
        })],
        Role::Assistant => {
            let calls = message.tool_calls();
            if calls.is_empty() {
                return vec![serde_json::json!({
                    "role": "assistant",
                    "content": message.text(),
                })];
            }
            let tool_calls: Vec<serde_json::Value> = calls
                .iter()
                .map(|tc| {
                    serde_json::json!({
                        "id": tc.id,
                        "type": "function",
                        "function": {
                            "name": tc.name,
                            "arguments": serde_json::json!({"query": tc.argument}).to_string(),
                        }
                    })
                })
                .collect();
            let text = message.text();
            vec![serde_json::json!({
                "role": "assistant",
                "content": if text.is_empty() { serde_json::Value::Null } else { text.into() },
                "tool_calls": tool_calls,
            })]
        }
        Role::Tool => message
            .content
            .iter()
            .filter_map(|part| match part {
                ContentPart::ToolResult(r) => Some(serde_json::json!({
                    "role": "tool",
                    "tool_call_id": r.tool_call_id,
                    "content": r.content,
                })),
                _ => None,
            })
            .collect(),
    }
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Deserialize)]
struct OpenAiToolCall {
    id: String,
    function: OpenAiFunction,
}

#[derive(Deserialize)]
struct OpenAiFunction {
    name: String,
    arguments: String,
}
