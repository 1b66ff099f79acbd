//! Core data types.

pub mod message;

pub use message::{ContentPart, ModelMessage, Role, ToolCall, ToolResult};
