//! Session command classification.

use crate::error::AlmanacError;

const PROMPT_USAGE: &str = "Usage: /prompt <name> \"arg1\" \"arg2\" ...";

/// One classified line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Terminate the session (`exit`, `quit`, `q`, case-insensitive).
    Exit,
    /// List the server's prompt templates (`/prompts`).
    ListPrompts,
    /// Run a named prompt with quoted positional arguments (`/prompt`).
    RunPrompt { name: String, args: Vec<String> },
    /// Anything else: a plain question for the turn router.
    Ask(String),
}

/// Classify a line of input.
///
/// Priority order matters: exit tokens first, then `/prompts` (before
/// `/prompt`, which is a prefix of it), then the run-prompt form, then
/// plain question. A malformed `/prompt` line is a usage error and
/// performs no action.
pub fn parse(line: &str) -> Result<Command, AlmanacError> {
    let trimmed = line.trim();

    if matches!(trimmed.to_lowercase().as_str(), "exit" | "quit" | "q") {
        return Ok(Command::Exit);
    }

    if trimmed.starts_with("/prompts") {
        return Ok(Command::ListPrompts);
    }

    if let Some(rest) = trimmed.strip_prefix("/prompt") {
        let parts = shlex::split(rest.trim())
            .ok_or_else(|| AlmanacError::Usage(PROMPT_USAGE.into()))?;
        let mut parts = parts.into_iter();
        let name = parts
            .next()
            .ok_or_else(|| AlmanacError::Usage(PROMPT_USAGE.into()))?;
        return Ok(Command::RunPrompt {
            name,
            args: parts.collect(),
        });
    }

    Ok(Command::Ask(trimmed.to_string()))
}
