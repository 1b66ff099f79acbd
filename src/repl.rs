//! The interactive session: command dispatch and the read-eval-print loop.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use crate::catalog::PromptCatalog;
use crate::command::{self, Command};
use crate::config::AlmanacConfig;
use crate::conversation::SessionManager;
use crate::error::AlmanacError;
use crate::mcp::McpPromptInfo;
use crate::router::TurnRouter;
use crate::types::ModelMessage;

pub const NO_PROMPTS_MESSAGE: &str = "No prompts found on the server.";

/// What one handled line produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The session should terminate.
    Quit,
    /// An assistant reply to a plain question.
    Reply(String),
    /// The formatted prompt catalog.
    PromptList(String),
    /// The assistant reply to a resolved prompt.
    PromptResult(String),
}

/// One interactive session: a conversation, a tool registry snapshot, and
/// the prompt catalog, driven line by line.
pub struct Session {
    config: AlmanacConfig,
    sessions: SessionManager,
    router: TurnRouter,
    catalog: PromptCatalog,
}

impl Session {
    pub fn new(config: AlmanacConfig, router: TurnRouter, catalog: PromptCatalog) -> Self {
        Self {
            config,
            sessions: SessionManager::new(),
            router,
            catalog,
        }
    }

    /// Handle one line of user input.
    ///
    /// Errors surface to the caller; the REPL renders them as a one-line
    /// message and keeps going. A failed command never ends the session.
    pub async fn handle_line(&mut self, line: &str) -> Result<Outcome, AlmanacError> {
        match command::parse(line)? {
            Command::Exit => Ok(Outcome::Quit),
            Command::ListPrompts => {
                let prompts = self.catalog.list_prompts().await?;
                Ok(Outcome::PromptList(format_prompt_list(&prompts)))
            }
            Command::RunPrompt { name, args } => {
                let seed = self.catalog.resolve(&name, &args).await?;
                let reply = self.run_turn(seed).await?;
                Ok(Outcome::PromptResult(reply))
            }
            Command::Ask(question) => {
                let reply = self.run_turn(question).await?;
                Ok(Outcome::Reply(reply))
            }
        }
    }

    /// The conversation for this session, if any turn has run.
    pub fn conversation(&self) -> Option<&crate::conversation::Conversation> {
        self.sessions.get(&self.config.session_id)
    }

    async fn run_turn(&mut self, user_text: String) -> Result<String, AlmanacError> {
        let session_id = self.config.session_id.clone();
        let conversation = self.sessions.get_or_create(&session_id);
        if conversation.is_empty() {
            conversation.append(ModelMessage::system(self.config.system_prompt.clone()));
        }
        self.router.run_turn(conversation, user_text).await
    }

    /// Run the read-eval-print loop over stdin/stdout until an exit token.
    pub async fn run(&mut self) -> Result<(), AlmanacError> {
        let mut stdout = tokio::io::stdout();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        stdout.write_all(banner(&self.router).as_bytes()).await?;
        stdout.flush().await?;

        loop {
            stdout.write_all(b"\nYou: ").await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break; // stdin closed
            };
            if line.trim().is_empty() {
                continue;
            }

            match self.handle_line(&line).await {
                Ok(Outcome::Quit) => break,
                Ok(Outcome::Reply(text)) => {
                    stdout.write_all(format!("AI: {text}\n").as_bytes()).await?;
                }
                Ok(Outcome::PromptList(listing)) => {
                    stdout.write_all(format!("{listing}\n").as_bytes()).await?;
                }
                Ok(Outcome::PromptResult(text)) => {
                    stdout
                        .write_all(format!("\n=== Prompt Result ===\n{text}\n").as_bytes())
                        .await?;
                }
                Err(e) => {
                    // Command-level failure: report and keep the loop alive,
                    // unless the MCP connection itself is gone.
                    stdout.write_all(format!("Error: {e}\n").as_bytes()).await?;
                    if !e.is_recoverable() {
                        stdout.flush().await?;
                        return Err(e);
                    }
                }
            }
            stdout.flush().await?;
        }

        info!(session = %self.config.session_id, "session ended");
        Ok(())
    }
}

fn banner(router: &TurnRouter) -> String {
    format!(
        "Almanac agent is ready ({} tools discovered).\n\
         Type a question or use the following commands:\n\
         \x20 /prompts                - to list available prompts\n\
         \x20 /prompt <name> \"args\"   - to run a specific prompt\n",
        router.registry().len()
    )
}

/// Format the prompt catalog for display.
pub fn format_prompt_list(prompts: &[McpPromptInfo]) -> String {
    if prompts.is_empty() {
        return NO_PROMPTS_MESSAGE.to_string();
    }

    let mut out = String::from("\nAvailable Prompts and Argument Structure:\n");
    for prompt in prompts {
        out.push_str(&format!("\nPrompt: {}\n", prompt.name));
        if prompt.arguments.is_empty() {
            out.push_str("  - No arguments required.\n");
        } else {
            for arg in &prompt.arguments {
                out.push_str(&format!("  - {arg}\n"));
            }
        }
    }
    out.push_str("\nUse: /prompt <prompt_name> \"arg1\" \"arg2\" ...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(name: &str, arguments: &[&str]) -> McpPromptInfo {
        McpPromptInfo {
            name: name.into(),
            arguments: arguments.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn empty_catalog_formats_to_exact_message() {
        assert_eq!(format_prompt_list(&[]), NO_PROMPTS_MESSAGE);
    }

    #[test]
    fn listing_names_prompts_and_arguments() {
        let listing = format_prompt_list(&[
            prompt("highlight_sections", &["topic"]),
            prompt("simple", &[]),
        ]);
        assert!(listing.contains("Prompt: highlight_sections"));
        assert!(listing.contains("  - topic"));
        assert!(listing.contains("Prompt: simple"));
        assert!(listing.contains("  - No arguments required."));
        assert!(listing.contains("Use: /prompt <prompt_name>"));
    }
}
