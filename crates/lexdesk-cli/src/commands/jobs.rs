use super::utils::{format_millis, open_session};
use anyhow::{Result, anyhow};
use clap::Subcommand;
use colored::Colorize;
use lexdesk_core::config::LexdeskConfig;
use lexdesk_core::job_application::{ApplicationDraft, ContentEdit, JobStatus};

#[derive(Subcommand)]
pub enum JobsAction {
    /// List applications, most recently applied first
    List,
    /// Record an application
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        company: String,
        #[arg(long, default_value = "")]
        url: String,
    },
    /// Change the status of an application
    Status {
        id: String,
        /// draft, applied, interviewing, offer, rejected or withdrawn
        status: String,
    },
    /// Replace the notes of an application
    Note { id: String, text: String },
}

pub async fn run(action: JobsAction, config: &LexdeskConfig) -> Result<()> {
    let session = open_session(config).await?;

    match action {
        JobsAction::List => {
            let jobs = session.jobs().list().await?;
            if jobs.is_empty() {
                println!("{}", "No applications".dimmed());
            }
            for job in jobs {
                let applied = job
                    .applied_date
                    .map(format_millis)
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}  {:<12} {:<16} {} @ {}",
                    job.id.yellow(),
                    job.status.to_string(),
                    applied.dimmed(),
                    job.job_title.bold(),
                    job.company
                );
            }
        }
        JobsAction::Add {
            title,
            company,
            url,
        } => {
            let record = session
                .jobs()
                .generate(ApplicationDraft {
                    job_title: title,
                    company,
                    job_url: url,
                    ..Default::default()
                })
                .await?;
            println!("{} {}", "Added".green(), record.id);
        }
        JobsAction::Status { id, status } => {
            let status: JobStatus = status.parse().map_err(|e: String| anyhow!(e))?;
            let record = session.jobs().transition(&id, status).await?;
            println!("{} {} -> {}", "Updated".green(), record.id, record.status);
        }
        JobsAction::Note { id, text } => {
            session
                .jobs()
                .edit_content(&id, ContentEdit::Notes(text))
                .await?;
            println!("{} {}", "Updated notes of".green(), id);
        }
    }

    session.shutdown();
    Ok(())
}
