//! Shared test doubles: a scripted completion provider and a mock MCP backend.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use almanac::config::AlmanacConfig;
use almanac::error::AlmanacError;
use almanac::mcp::{McpOps, McpPromptInfo, McpToolInfo};
use almanac::provider::{CompletionRequest, ModelProvider, ModelTurn};

/// Completion provider that replays a scripted sequence of turns.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<ModelTurn, AlmanacError>>>,
}

impl ScriptedProvider {
    pub fn new(turns: Vec<Result<ModelTurn, AlmanacError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(turns.into()),
        })
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn model_id(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _: &CompletionRequest) -> Result<ModelTurn, AlmanacError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("provider script exhausted")
    }
}

/// Mock MCP backend with configurable tools, prompts, and behaviors.
pub struct MockBackend {
    pub tools: Vec<McpToolInfo>,
    pub tool_responses: Mutex<VecDeque<Result<String, String>>>,
    pub prompts: Result<Vec<McpPromptInfo>, ()>,
    pub rendered: String,
    pub render_calls: Arc<AtomicUsize>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            tools: Vec::new(),
            tool_responses: Mutex::new(VecDeque::new()),
            prompts: Ok(Vec::new()),
            rendered: String::new(),
            render_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockBackend {
    pub fn with_tool(mut self, name: &str, description: &str) -> Self {
        self.tools.push(McpToolInfo {
            name: name.into(),
            description: Some(description.into()),
        });
        self
    }

    pub fn with_tool_response(self, response: Result<&str, &str>) -> Self {
        self.tool_responses
            .lock()
            .unwrap()
            .push_back(response.map(str::to_owned).map_err(str::to_owned));
        self
    }

    pub fn with_prompt(mut self, name: &str, arguments: &[&str]) -> Self {
        let info = McpPromptInfo {
            name: name.into(),
            arguments: arguments.iter().map(|a| a.to_string()).collect(),
        };
        match &mut self.prompts {
            Ok(prompts) => prompts.push(info),
            Err(()) => self.prompts = Ok(vec![info]),
        }
        self
    }

    pub fn with_unreachable_catalog(mut self) -> Self {
        self.prompts = Err(());
        self
    }

    pub fn with_rendered(mut self, text: &str) -> Self {
        self.rendered = text.into();
        self
    }
}

#[async_trait]
impl McpOps for MockBackend {
    async fn list_tools(&mut self) -> Result<Vec<McpToolInfo>, AlmanacError> {
        Ok(self.tools.clone())
    }

    async fn call_tool(&mut self, name: &str, _argument: &str) -> Result<String, AlmanacError> {
        match self.tool_responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(AlmanacError::ToolExecution {
                tool_name: name.to_string(),
                message,
            }),
            None => Ok("No result".into()),
        }
    }

    async fn list_prompts(&mut self) -> Result<Vec<McpPromptInfo>, AlmanacError> {
        match &self.prompts {
            Ok(prompts) => Ok(prompts.clone()),
            Err(()) => Err(AlmanacError::CatalogUnavailable(
                "transport closed".into(),
            )),
        }
    }

    async fn render_prompt(
        &mut self,
        _name: &str,
        _arguments: serde_json::Map<String, serde_json::Value>,
    ) -> Result<String, AlmanacError> {
        self.render_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.rendered.clone())
    }
}

/// A config that never touches the process environment.
pub fn test_config() -> AlmanacConfig {
    AlmanacConfig {
        server_command: "python".into(),
        server_args: vec!["mcp_server.py".into()],
        model: "gpt-4".into(),
        temperature: 0.0,
        session_id: "wiki-session".into(),
        system_prompt: "You are a helpful assistant that uses tools to explore Wikipedia.".into(),
        api_key: None,
        base_url: None,
    }
}
