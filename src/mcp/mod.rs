//! MCP client layer: child-process transport, tool and prompt operations.

pub mod client;

pub use client::{connect_stdio, McpClient};

use async_trait::async_trait;

use crate::error::AlmanacError;

/// A tool advertised by the MCP server.
#[derive(Debug, Clone, PartialEq)]
pub struct McpToolInfo {
    pub name: String,
    pub description: Option<String>,
}

/// A prompt template advertised by the MCP server.
///
/// `arguments` holds the required argument names in declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct McpPromptInfo {
    pub name: String,
    pub arguments: Vec<String>,
}

/// The four remote operations this crate consumes.
///
/// [`McpClient`] is the real implementation; tests substitute mocks so the
/// registry, catalog, and router can be exercised without a subprocess.
#[async_trait]
pub trait McpOps: Send {
    /// List the tools the server exposes.
    async fn list_tools(&mut self) -> Result<Vec<McpToolInfo>, AlmanacError>;

    /// Invoke a named tool with a single text argument, returning text.
    async fn call_tool(&mut self, name: &str, argument: &str) -> Result<String, AlmanacError>;

    /// List the prompt templates the server exposes.
    async fn list_prompts(&mut self) -> Result<Vec<McpPromptInfo>, AlmanacError>;

    /// Render a named prompt with bound argument values.
    async fn render_prompt(
        &mut self,
        name: &str,
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> Result<String, AlmanacError>;
}

/// Shared handle to the MCP connection.
///
/// The registry and the catalog both talk to the same server; the mutex
/// serializes access from the single session task.
pub type SharedMcp = std::sync::Arc<tokio::sync::Mutex<Box<dyn McpOps>>>;

/// Wrap an implementation into the shared handle type.
pub fn shared(ops: impl McpOps + 'static) -> SharedMcp {
    std::sync::Arc::new(tokio::sync::Mutex::new(Box::new(ops)))
}
