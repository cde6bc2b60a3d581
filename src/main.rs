//! Skiff CLI binary entry point.

use std::sync::Arc;

use clap::Parser;
use skiff::agent::{AgentAdapter, InteractiveAgent};
use skiff::cli::{AskArgs, ChatArgs, Cli, Commands};
use skiff::client::{ClientConnector, SubprocessConnector};
use skiff::error::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Chat(args) => handle_chat(args).await,
        Commands::Ask(args) => handle_ask(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn build_adapter(
    config_dir: std::path::PathBuf,
    sdk_bin: Option<std::path::PathBuf>,
) -> Result<AgentAdapter> {
    let mut adapter = AgentAdapter::new(config_dir)?;
    if let Some(bin) = sdk_bin {
        let connector: Arc<dyn ClientConnector> = Arc::new(SubprocessConnector::new(bin));
        adapter = adapter.with_connector(connector);
    }
    Ok(adapter)
}

async fn handle_chat(args: ChatArgs) -> Result<()> {
    let mut adapter = build_adapter(args.config_dir, args.sdk_bin)?;
    if let Some(system) = args.system {
        adapter = adapter.with_system_prompt(system);
    }
    if let Some(model) = args.model {
        adapter = adapter.with_model(model);
    }
    InteractiveAgent::new(adapter).run().await
}

async fn handle_ask(args: AskArgs) -> Result<()> {
    let mut adapter = build_adapter(args.config_dir, args.sdk_bin)?;
    let prompt = args.prompt;
    let reply = adapter
        .scoped(move |agent| Box::pin(async move { agent.process_message(&prompt).await }))
        .await?;
    println!("{reply}");
    Ok(())
}
