//! Session configuration.
//!
//! All knobs are explicit values passed into the session constructor.
//! Nothing here is global: the MCP server launch parameters and the session
//! identifier are required fields, not module-level constants.

const DEFAULT_MODEL: &str = "gpt-4";
const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that uses tools to explore Wikipedia.";

/// Configuration for one assistant session.
#[derive(Debug, Clone)]
pub struct AlmanacConfig {
    /// Command used to launch the MCP server subprocess.
    pub server_command: String,
    /// Arguments for the MCP server subprocess.
    pub server_args: Vec<String>,
    /// Model identifier sent to the completion API.
    pub model: String,
    /// Sampling temperature. Fixed to the deterministic minimum.
    pub temperature: f64,
    /// Session identifier keying the conversation state.
    pub session_id: String,
    /// System prompt prepended to the first turn.
    pub system_prompt: String,
    /// API key for the completion service.
    ///
    /// Resolved from the environment at startup. `None` is not fatal here;
    /// every model call fails with an authentication error instead.
    pub api_key: Option<String>,
    /// Base URL override for the completion API.
    pub base_url: Option<String>,
}

impl AlmanacConfig {
    /// Build a config for the given server launch parameters and session id,
    /// resolving credentials from the environment.
    pub fn from_env(
        server_command: impl Into<String>,
        server_args: Vec<String>,
        session_id: impl Into<String>,
    ) -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self {
            server_command: server_command.into(),
            server_args,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            session_id: session_id.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: std::env::var("OPENAI_BASE_URL").ok(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    pub fn with_base_url(mut self, url: Option<String>) -> Self {
        self.base_url = url;
        self
    }
}
