//! Prompt catalog: named templates resolved by the remote server.

use crate::error::AlmanacError;
use crate::mcp::{McpPromptInfo, SharedMcp};

/// Adapter over the server's prompt templates.
///
/// The catalog is fetched on demand each time a list or run command is
/// issued, never cached; the remote set may change between commands.
pub struct PromptCatalog {
    client: SharedMcp,
}

impl PromptCatalog {
    pub fn new(client: SharedMcp) -> Self {
        Self { client }
    }

    /// List the prompts the server currently exposes.
    ///
    /// An empty catalog is an empty vec, not an error; only an unreachable
    /// service yields [`AlmanacError::CatalogUnavailable`].
    pub async fn list_prompts(&self) -> Result<Vec<McpPromptInfo>, AlmanacError> {
        let mut ops = self.client.lock().await;
        ops.list_prompts().await
    }

    /// Resolve a named prompt with positional arguments into rendered text.
    ///
    /// The argument count must match the descriptor exactly; on mismatch
    /// the render capability is never called. Arguments bind positionally
    /// in the descriptor's declared order.
    pub async fn resolve(&self, name: &str, args: &[String]) -> Result<String, AlmanacError> {
        let prompts = self.list_prompts().await?;
        let descriptor = prompts
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| AlmanacError::PromptNotFound { name: name.into() })?;

        if args.len() != descriptor.arguments.len() {
            return Err(AlmanacError::ArgumentCountMismatch {
                expected: descriptor.arguments.len(),
                actual: args.len(),
                arguments: descriptor.arguments,
            });
        }

        let bound: serde_json::Map<String, serde_json::Value> = descriptor
            .arguments
            .iter()
            .zip(args)
            .map(|(arg_name, value)| (arg_name.clone(), serde_json::Value::String(value.clone())))
            .collect();

        let mut ops = self.client.lock().await;
        ops.render_prompt(name, bound).await
    }
}
