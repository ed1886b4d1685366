use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "lexdesk")]
#[command(about = "LexDesk CLI - inspect and edit the local LexDesk data", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the data directory from the config
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Inspect and edit the autosaved form inputs
    Draft {
        #[command(subcommand)]
        action: commands::draft::DraftAction,
    },
    /// Manage checkpoints
    Checkpoint {
        #[command(subcommand)]
        action: commands::checkpoint::CheckpointAction,
    },
    /// Manage remembered lawyers
    Lawyers {
        #[command(subcommand)]
        action: commands::lawyers::LawyersAction,
    },
    /// Manage job applications
    Jobs {
        #[command(subcommand)]
        action: commands::jobs::JobsAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = commands::utils::config_service(cli.config)?;
    let mut config = config_service.load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = Some(data_dir);
    }
    commands::utils::init_tracing(&config.log_level);
    tracing::debug!(config = %config_service.path().display(), "Configuration loaded");

    match cli.command {
        Commands::Config { action } => commands::config::run(action, &config_service, &config)?,
        Commands::Draft { action } => commands::draft::run(action, &config).await?,
        Commands::Checkpoint { action } => commands::checkpoint::run(action, &config).await?,
        Commands::Lawyers { action } => commands::lawyers::run(action, &config).await?,
        Commands::Jobs { action } => commands::jobs::run(action, &config).await?,
    }

    Ok(())
}
