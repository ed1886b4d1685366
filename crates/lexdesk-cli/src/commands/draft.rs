use super::utils::{open_session, preview};
use anyhow::{Result, anyhow};
use clap::Subcommand;
use colored::Colorize;
use lexdesk_core::autosave::{AutoSaveSnapshot, FieldValue};
use lexdesk_core::config::LexdeskConfig;
use lexdesk_core::state::{Action, FormField, Tool};

#[derive(Subcommand)]
pub enum DraftAction {
    /// Print the autosaved form inputs
    Show,
    /// Set one form input, e.g. `report.title "Lease dispute"`
    Set { field: String, value: String },
    /// Set the contact block used by the job assistant
    Contact {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Clear the inputs of one tool (e.g. `jobAssistant`)
    Clear { tool: String },
}

pub async fn run(action: DraftAction, config: &LexdeskConfig) -> Result<()> {
    let session = open_session(config).await?;

    match action {
        DraftAction::Show => {
            let snapshot = AutoSaveSnapshot::capture(&session.state());
            let mut shown = 0;
            for (name, value) in snapshot.iter() {
                let text = match value {
                    FieldValue::Text(text) => text.clone(),
                    FieldValue::Group(group) => group
                        .iter()
                        .filter(|(_, v)| !v.is_empty())
                        .map(|(k, v)| format!("{}={}", k, v))
                        .collect::<Vec<_>>()
                        .join(", "),
                };
                if text.is_empty() {
                    continue;
                }
                println!("{:<30} {}", name.cyan(), preview(&text, 60));
                shown += 1;
            }
            if shown == 0 {
                println!("{}", "No saved inputs".dimmed());
            }
        }
        DraftAction::Set { field, value } => {
            let form_field = FormField::from_name(&field).ok_or_else(|| {
                let names: Vec<_> = FormField::all().iter().map(|f| f.name()).collect();
                anyhow!("Unknown field '{}'. Known fields: {}", field, names.join(", "))
            })?;
            session.dispatch(Action::SetField {
                field: form_field,
                value,
            });
            session.save_now()?;
            println!("{} {}", "Saved".green(), field);
        }
        DraftAction::Contact { name, email, phone } => {
            session.dispatch(Action::SetContact(lexdesk_core::state::ContactDetails {
                full_name: name,
                email,
                phone,
            }));
            session.save_now()?;
            println!("{} contact details", "Saved".green());
        }
        DraftAction::Clear { tool } => {
            let tool: Tool = tool.parse().map_err(|e: String| anyhow!(e))?;
            session.dispatch(Action::ResetTool(tool));
            session.save_now()?;
            println!("{} {}", "Cleared".green(), tool.as_str());
        }
    }

    session.shutdown();
    Ok(())
}
