//! Model completion capability.
//!
//! The language model is an external collaborator: the router only needs
//! "here is the history and the available tools, give me text or tool
//! calls". [`ModelProvider`] is that seam; [`openai`] is the one real
//! implementation.

pub mod http;
pub mod openai;

use async_trait::async_trait;

use crate::error::AlmanacError;
use crate::types::{ModelMessage, ToolCall};

/// Tool definition advertised to the model API.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A request to the completion capability.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ModelMessage>,
    pub tools: Vec<ToolDefinition>,
}

/// What the model decided to do with a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelTurn {
    /// Plain assistant text. Terminal for the turn.
    Text(String),
    /// One or more requested tool invocations, with any commentary text
    /// the model emitted alongside them.
    ToolCalls { text: String, calls: Vec<ToolCall> },
}

/// Core trait implemented by completion providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// The model id this provider instance serves.
    fn model_id(&self) -> &str;

    /// Run one completion over the full conversation.
    async fn complete(&self, request: &CompletionRequest) -> Result<ModelTurn, AlmanacError>;
}

/// Extract the single text argument from a provider's JSON arguments value.
///
/// Models return tool arguments as a JSON object (usually `{"query": "..."}`);
/// the tools in this system take exactly one text argument, so anything
/// else collapses to a best-effort string.
pub fn argument_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(map) => {
            if let Some(serde_json::Value::String(s)) = map.get("query") {
                return s.clone();
            }
            map.values()
                .find_map(|v| v.as_str().map(str::to_owned))
                .unwrap_or_else(|| value.to_string())
        }
        other => other.to_string(),
    }
}
