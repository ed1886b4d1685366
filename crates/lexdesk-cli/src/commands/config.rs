use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use lexdesk_core::config::LexdeskConfig;
use lexdesk_infrastructure::ConfigService;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a config file with the default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

pub fn run(action: ConfigAction, service: &ConfigService, config: &LexdeskConfig) -> Result<()> {
    match action {
        ConfigAction::Init { force } => {
            service.write(&LexdeskConfig::default(), force)?;
            println!("{} {}", "Wrote".green(), service.path().display());
        }
        ConfigAction::Show => {
            println!("{}", format!("# {}", service.path().display()).dimmed());
            print!("{}", config.to_toml_string()?);
        }
    }
    Ok(())
}
