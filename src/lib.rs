//! Almanac, a conversational MCP assistant.
//!
//! Routes natural-language questions to lookup tools exposed by an MCP
//! server subprocess, and returns synthesized answers. The core is a
//! tool-routing conversational loop with a pluggable tool registry and
//! slash-command prompt invocation.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use almanac::catalog::PromptCatalog;
//! use almanac::config::AlmanacConfig;
//! use almanac::provider::openai::OpenAiProvider;
//! use almanac::registry::ToolRegistry;
//! use almanac::repl::Session;
//! use almanac::router::TurnRouter;
//!
//! # async fn example() -> almanac::error::Result<()> {
//! let config = AlmanacConfig::from_env("python", vec!["mcp_server.py".into()], "wiki-session");
//! let client = almanac::mcp::shared(
//!     almanac::mcp::connect_stdio(&config.server_command, &config.server_args).await?,
//! );
//! let registry = ToolRegistry::discover(client.clone()).await?;
//! let provider = Arc::new(OpenAiProvider::new(&config));
//! let router = TurnRouter::new(provider, registry);
//! let catalog = PromptCatalog::new(client);
//! Session::new(config, router, catalog).run().await?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod command;
pub mod config;
pub mod conversation;
pub mod error;
pub mod mcp;
pub mod provider;
pub mod registry;
pub mod repl;
pub mod router;
pub mod types;
