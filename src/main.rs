use clap::{Parser, Subcommand};
use tracing::info;

use devin_mcp::{config, devin, server, slack, tools};

#[derive(Parser, Debug)]
#[command(name = "devin-mcp", version, about = "MCP stdio bridge for Devin and Slack")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the stdio server (the default)
    Serve,
    /// Print the tool catalogue as JSON and exit
    Tools,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries JSON-RPC frames; all diagnostics go to stderr.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(Command::Tools) = cli.command {
        println!("{}", serde_json::to_string_pretty(&tools::list_tools())?);
        return Ok(());
    }

    // Best-effort .env load; absence is not an error.
    let _ = dotenvy::dotenv();

    // Missing required configuration exits non-zero before serving.
    let cfg = config::Config::from_env()?;
    info!(
        base_url = %cfg.devin_base_url,
        org = %cfg.org_name,
        slack = cfg.slack.is_some(),
        "configuration loaded"
    );

    let devin = devin::DevinClient::new(cfg.devin_base_url.clone(), cfg.devin_api_key.clone());
    let slack = cfg
        .slack
        .as_ref()
        .map(|s| slack::SlackClient::new(s.bot_token.clone()));

    let ctx = tools::ToolContext {
        config: cfg,
        devin,
        slack,
    };

    server::McpServer::new(ctx).run().await
}
