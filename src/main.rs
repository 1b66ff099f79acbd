//! Almanac CLI binary entry point.

use std::sync::Arc;

use clap::Parser;

use almanac::catalog::PromptCatalog;
use almanac::config::AlmanacConfig;
use almanac::mcp;
use almanac::provider::openai::OpenAiProvider;
use almanac::registry::ToolRegistry;
use almanac::repl::Session;
use almanac::router::TurnRouter;

/// Conversational MCP assistant.
#[derive(Parser, Debug)]
#[command(name = "almanac", version, about = "Conversational MCP assistant")]
struct Cli {
    /// Command used to launch the MCP server subprocess
    #[arg(long, default_value = "python")]
    server_command: String,

    /// Arguments for the MCP server subprocess
    #[arg(long = "server-arg", default_value = "mcp_server.py")]
    server_args: Vec<String>,

    /// Model identifier for the completion API
    #[arg(short, long, default_value = "gpt-4")]
    model: String,

    /// Session identifier keying the conversation state
    #[arg(long, default_value = "wiki-session")]
    session: String,

    /// System prompt override
    #[arg(short = 's', long)]
    system: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "almanac=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config =
        AlmanacConfig::from_env(cli.server_command, cli.server_args, cli.session)
            .with_model(cli.model);
    if let Some(system) = cli.system {
        config = config.with_system_prompt(system);
    }

    let client = mcp::shared(
        mcp::connect_stdio(&config.server_command, &config.server_args).await?,
    );

    let registry = ToolRegistry::discover(client.clone()).await?;
    let provider = Arc::new(OpenAiProvider::new(&config));
    let router = TurnRouter::new(provider, registry);
    let catalog = PromptCatalog::new(client);

    Session::new(config, router, catalog).run().await?;
    Ok(())
}
