use super::utils::{format_millis, open_session};
use anyhow::{Result, anyhow};
use clap::Subcommand;
use colored::Colorize;
use lexdesk_core::config::LexdeskConfig;

#[derive(Subcommand)]
pub enum CheckpointAction {
    /// List checkpoints, most recent first
    List,
    /// Snapshot the current state
    Create {
        /// Checkpoint name (defaults to the creation time)
        #[arg(default_value = "")]
        name: String,
    },
    /// Replace the current state with a checkpoint
    Restore { id: String },
    /// Delete a checkpoint
    Delete { id: String },
}

pub async fn run(action: CheckpointAction, config: &LexdeskConfig) -> Result<()> {
    let session = open_session(config).await?;

    match action {
        CheckpointAction::List => {
            let checkpoints = session.checkpoints();
            if checkpoints.is_empty() {
                println!("{}", "No checkpoints".dimmed());
            }
            for checkpoint in checkpoints {
                println!(
                    "{}  {}  {}",
                    checkpoint.id.yellow(),
                    format_millis(checkpoint.timestamp).dimmed(),
                    checkpoint.name
                );
            }
        }
        CheckpointAction::Create { name } => {
            let summary = session.create_checkpoint(&name)?;
            println!("{} {} ({})", "Created".green(), summary.name, summary.id);
        }
        CheckpointAction::Restore { id } => {
            session
                .restore_checkpoint(&id)
                .map_err(|e| anyhow!(e.user_message()))?;
            session.save_now()?;
            println!("{} {}", "Restored".green(), id);
        }
        CheckpointAction::Delete { id } => {
            session.delete_checkpoint(&id)?;
            println!("{} {}", "Deleted".green(), id);
        }
    }

    session.shutdown();
    Ok(())
}
