//! Tool registry: remote tools as uniform callable capabilities.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::error::AlmanacError;
use crate::mcp::SharedMcp;
use crate::provider::ToolDefinition;

/// A named capability taking one text argument and returning text.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (must match what the model calls).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Invoke the tool with a single text argument.
    async fn invoke(&self, argument: &str) -> Result<String, AlmanacError>;
}

/// A tool discovered on the MCP server, bound to the shared connection.
///
/// Each descriptor carries its own name explicitly rather than capturing it
/// in a closure, so there is no shared-mutable-capture hazard when the
/// registry is built in a loop.
pub struct RemoteTool {
    name: String,
    description: String,
    client: SharedMcp,
}

#[async_trait]
impl Tool for RemoteTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn invoke(&self, argument: &str) -> Result<String, AlmanacError> {
        let mut client = self.client.lock().await;
        client.call_tool(&self.name, argument).await
    }
}

impl std::fmt::Debug for RemoteTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Snapshot of the tools available for one session.
///
/// Built once from the discovery call at session start; not refreshed.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Discover the remote tool set.
    ///
    /// Fails with [`AlmanacError::RegistryUnavailable`] when the server
    /// cannot be reached.
    pub async fn discover(client: SharedMcp) -> Result<Self, AlmanacError> {
        let infos = {
            let mut ops = client.lock().await;
            ops.list_tools().await?
        };

        let mut tools: Vec<Arc<dyn Tool>> = Vec::with_capacity(infos.len());
        for info in infos {
            if tools.iter().any(|t| t.name() == info.name) {
                warn!(tool = %info.name, "duplicate tool name in registry snapshot, keeping first");
                continue;
            }
            let description = info
                .description
                .unwrap_or_else(|| format!("Tool: {}", info.name));
            tools.push(Arc::new(RemoteTool {
                name: info.name,
                description,
                client: client.clone(),
            }));
        }

        Ok(Self { tools })
    }

    /// Build a registry from preconstructed tools. Used by tests.
    pub fn from_tools(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Tool definitions in the shape the completion provider advertises.
    ///
    /// Every tool in this system takes exactly one text argument named
    /// `query`, so the schema is fixed.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "The text input for the tool"
                        }
                    },
                    "required": ["query"]
                }),
            })
            .collect()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .finish()
    }
}
