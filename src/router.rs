//! Turn router: the reasoning/act/observe loop.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::conversation::Conversation;
use crate::error::AlmanacError;
use crate::provider::{CompletionRequest, ModelProvider, ModelTurn, ToolDefinition};
use crate::registry::ToolRegistry;
use crate::types::{ModelMessage, ToolCall};

/// State of one turn through the router.
///
/// `Failed` is the `Err` path out of [`TurnRouter::run_turn`]; every other
/// state is explicit here.
#[derive(Debug)]
enum TurnState {
    /// Waiting on the completion capability.
    AwaitingModel,
    /// The model requested tool invocations.
    RespondedWithToolCalls { text: String, calls: Vec<ToolCall> },
    /// All requested calls have produced result messages.
    AwaitingToolResults,
    /// The model produced plain text. Terminal.
    RespondedWithText(String),
}

/// Drives one full turn: user message in, final assistant text out,
/// with any number of tool hops in between.
pub struct TurnRouter {
    provider: Arc<dyn ModelProvider>,
    registry: ToolRegistry,
}

impl TurnRouter {
    pub fn new(provider: Arc<dyn ModelProvider>, registry: ToolRegistry) -> Self {
        Self { provider, registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run one turn to completion.
    ///
    /// Appends the user message, then alternates model calls and tool
    /// execution until the model emits plain text. The chain length is
    /// bounded only by the model's own decision to stop requesting tools.
    ///
    /// On a model-service failure the turn aborts with `Err` and nothing
    /// is appended after the last completed step: the triggering user
    /// message (and any tool results already folded in) remain, so a retry
    /// does not duplicate them.
    pub async fn run_turn(
        &self,
        conversation: &mut Conversation,
        user_text: impl Into<String>,
    ) -> Result<String, AlmanacError> {
        conversation.append(ModelMessage::user(user_text));

        let definitions: Vec<ToolDefinition> = self.registry.definitions();
        let mut state = TurnState::AwaitingModel;

        loop {
            state = match state {
                TurnState::AwaitingModel => {
                    let request = CompletionRequest {
                        messages: conversation.messages().to_vec(),
                        tools: definitions.clone(),
                    };
                    match self.provider.complete(&request).await? {
                        ModelTurn::Text(text) => TurnState::RespondedWithText(text),
                        ModelTurn::ToolCalls { text, calls } => {
                            TurnState::RespondedWithToolCalls { text, calls }
                        }
                    }
                }
                TurnState::RespondedWithToolCalls { text, calls } => {
                    debug!(count = calls.len(), "model requested tool calls");
                    conversation.append(ModelMessage::assistant_with_calls(text, calls.clone()));
                    for call in &calls {
                        let (content, is_error) = self.invoke_tool(call).await;
                        conversation.append(ModelMessage::tool_result(
                            call.id.clone(),
                            content,
                            is_error,
                        ));
                    }
                    TurnState::AwaitingToolResults
                }
                TurnState::AwaitingToolResults => TurnState::AwaitingModel,
                TurnState::RespondedWithText(text) => {
                    conversation.append(ModelMessage::assistant(text.clone()));
                    return Ok(text);
                }
            };
        }
    }

    /// Invoke one requested tool call, absorbing failures into result text.
    ///
    /// A failing tool (or a call naming a tool the registry does not have)
    /// yields error text as the result so the next model call can see and
    /// react to it; it never raises out of the turn.
    async fn invoke_tool(&self, call: &ToolCall) -> (String, bool) {
        match self.registry.get(&call.name) {
            Some(tool) => match tool.invoke(&call.argument).await {
                Ok(text) => (text, false),
                Err(e) => {
                    warn!(tool = %call.name, error = %e, "tool execution failed");
                    (format!("Error calling tool {}: {e}", call.name), true)
                }
            },
            None => {
                warn!(tool = %call.name, "tool not found in registry");
                (format!("Error calling tool {}: tool not found", call.name), true)
            }
        }
    }
}
