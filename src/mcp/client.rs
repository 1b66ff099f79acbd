//! MCP client over a child-process stdio transport.

use async_trait::async_trait;
use rmcp::{
    model::{
        CallToolRequestParams, CallToolResult, Content, GetPromptRequestParams,
        PromptMessageContent, ResourceContents,
    },
    service::{ClientInitializeError, DynService, RoleClient, RunningService, ServiceError},
    transport::TokioChildProcess,
    ServiceExt,
};
use tracing::debug;

use crate::error::AlmanacError;

use super::{McpOps, McpPromptInfo, McpToolInfo};

type DynClientService = Box<dyn DynService<RoleClient>>;
pub type McpRunningService = RunningService<RoleClient, DynClientService>;

/// Client for a Model Context Protocol server.
pub struct McpClient {
    session: McpRunningService,
}

/// Launch the MCP server subprocess and complete the initialize handshake.
pub async fn connect_stdio(command: &str, args: &[String]) -> Result<McpClient, AlmanacError> {
    debug!(command, ?args, "launching MCP server subprocess");
    let mut cmd = tokio::process::Command::new(command);
    cmd.args(args);
    let transport = TokioChildProcess::new(cmd)?;
    let session = ()
        .into_dyn()
        .serve(transport)
        .await
        .map_err(map_initialize_error)?;
    Ok(McpClient::from_running_service(session))
}

impl McpClient {
    /// Create a client from an already-running rmcp service.
    ///
    /// Initialization handshake is already handled by rmcp `serve(...)`.
    pub fn from_running_service(session: McpRunningService) -> Self {
        Self { session }
    }
}

#[async_trait]
impl McpOps for McpClient {
    async fn list_tools(&mut self) -> Result<Vec<McpToolInfo>, AlmanacError> {
        let tools = self
            .session
            .list_all_tools()
            .await
            .map_err(|e| map_unavailable("list_tools", e, Unavailable::Registry))?;

        Ok(tools
            .into_iter()
            .map(|tool| McpToolInfo {
                name: tool.name.to_string(),
                description: tool.description.map(|d| d.to_string()),
            })
            .collect())
    }

    async fn call_tool(&mut self, name: &str, argument: &str) -> Result<String, AlmanacError> {
        let mut arguments = serde_json::Map::new();
        arguments.insert("query".into(), serde_json::Value::String(argument.into()));

        let result = self
            .session
            .call_tool(CallToolRequestParams {
                meta: None,
                name: name.to_owned().into(),
                arguments: Some(arguments),
                task: None,
            })
            .await
            .map_err(|e| AlmanacError::ToolExecution {
                tool_name: name.to_string(),
                message: e.to_string(),
            })?;

        map_call_result(name, result)
    }

    async fn list_prompts(&mut self) -> Result<Vec<McpPromptInfo>, AlmanacError> {
        let prompts = self
            .session
            .list_all_prompts()
            .await
            .map_err(|e| map_unavailable("list_prompts", e, Unavailable::Catalog))?;

        Ok(prompts
            .into_iter()
            .map(|prompt| McpPromptInfo {
                name: prompt.name.to_string(),
                arguments: prompt
                    .arguments
                    .unwrap_or_default()
                    .into_iter()
                    .map(|arg| arg.name.to_string())
                    .collect(),
            })
            .collect())
    }

    async fn render_prompt(
        &mut self,
        name: &str,
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> Result<String, AlmanacError> {
        let result = self
            .session
            .get_prompt(GetPromptRequestParams {
                meta: None,
                name: name.to_owned(),
                arguments: Some(arguments),
            })
            .await
            .map_err(|e| map_unavailable("get_prompt", e, Unavailable::Catalog))?;

        let text = result
            .messages
            .into_iter()
            .next()
            .and_then(|message| match message.content {
                PromptMessageContent::Text { text } => Some(text),
                _ => None,
            })
            .ok_or_else(|| {
                AlmanacError::CatalogUnavailable(format!(
                    "prompt '{name}' rendered no text content"
                ))
            })?;

        Ok(text)
    }
}

#[derive(Clone, Copy)]
enum Unavailable {
    Registry,
    Catalog,
}

fn map_unavailable(context: &str, error: ServiceError, kind: Unavailable) -> AlmanacError {
    let message = match error {
        ServiceError::McpError(e) => {
            format!("{context}: MCP error {}: {}", e.code.0, e.message)
        }
        ServiceError::TransportSend(e) => format!("{context}: transport send failed: {e}"),
        ServiceError::TransportClosed => format!("{context}: transport closed"),
        ServiceError::UnexpectedResponse => format!("{context}: unexpected MCP response"),
        ServiceError::Timeout { timeout } => {
            format!("{context}: timed out after {}ms", timeout.as_millis())
        }
        other => format!("{context}: {other}"),
    };
    match kind {
        Unavailable::Registry => AlmanacError::RegistryUnavailable(message),
        Unavailable::Catalog => AlmanacError::CatalogUnavailable(message),
    }
}

fn map_initialize_error(error: ClientInitializeError) -> AlmanacError {
    AlmanacError::RegistryUnavailable(format!("MCP initialize failed: {error}"))
}

fn extract_text_content(content: &[Content]) -> Option<String> {
    let mut lines = Vec::new();
    for item in content {
        if let Some(text) = item.as_text() {
            lines.push(text.text.clone());
            continue;
        }
        if let Some(resource) = item.as_resource() {
            if let ResourceContents::TextResourceContents { text, .. } = &resource.resource {
                lines.push(text.clone());
            }
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn map_call_result(name: &str, result: CallToolResult) -> Result<String, AlmanacError> {
    let text = extract_text_content(&result.content);

    if result.is_error.unwrap_or(false) {
        let message = result
            .structured_content
            .as_ref()
            .map(|v| v.to_string())
            .or_else(|| text.clone())
            .unwrap_or_else(|| "tool returned an error result".into());
        return Err(AlmanacError::ToolExecution {
            tool_name: name.to_string(),
            message,
        });
    }

    // Servers usually answer with text content; structured payloads are
    // surfaced as their JSON text so the model can still read them.
    Ok(text
        .or_else(|| result.structured_content.map(|v| v.to_string()))
        .unwrap_or_else(|| "No result".into()))
}
