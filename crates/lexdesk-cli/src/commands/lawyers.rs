use super::utils::open_session;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use lexdesk_core::config::LexdeskConfig;
use lexdesk_core::lawyer::LawyerRecord;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum LawyersAction {
    /// List remembered lawyers
    List,
    /// Import search results from a JSON array of lawyer records
    Import { file: PathBuf },
    /// Forget every remembered lawyer
    Clear,
}

pub async fn run(action: LawyersAction, config: &LexdeskConfig) -> Result<()> {
    let session = open_session(config).await?;

    match action {
        LawyersAction::List => {
            let lawyers = session.lawyers().all().await?;
            if lawyers.is_empty() {
                println!("{}", "No lawyers stored".dimmed());
            }
            for lawyer in lawyers {
                println!(
                    "{}  {}  {}",
                    lawyer.name.bold(),
                    format!("{} / {}", lawyer.specialty, lawyer.city).dimmed(),
                    lawyer.website.cyan()
                );
            }
        }
        LawyersAction::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let records: Vec<LawyerRecord> = serde_json::from_str(&content)
                .with_context(|| format!("{} is not a JSON array of lawyers", file.display()))?;
            let written = session.complete_lawyer_search(records).await?;
            println!("{} {} lawyers", "Stored".green(), written);
        }
        LawyersAction::Clear => {
            session.lawyers().forget_all().await?;
            println!("{}", "Cleared lawyers".green());
        }
    }

    session.shutdown();
    Ok(())
}
