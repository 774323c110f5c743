use std::path::PathBuf;

use battle_tab_server::commands::Command;
use battle_tab_server::config::read_config;
use clap::Parser;
use tracing_subscriber::EnvFilter;


#[derive(Parser)]
#[command(name = "battle_tab_server", about = "Scoring server for dance battle competitions")]
struct Cli {
    /// Path to a YAML config file. Defaults to $BATTLE_TAB_SERVER_CONFIG.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = read_config(cli.config.as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging_config))
        .init();

    cli.command.unwrap_or_default().run(&config).await
}
