pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::controller::Feedback;
use crate::dashboard::{Dashboard, Mount};
use crate::error::{AdminError, AdminResult};
use crate::gateway::rest;
use crate::types::Route;
use utils::{ConsoleNotifier, PromptConfirm};

#[derive(Parser)]
#[command(name = "portfolio-admin")]
#[command(about = "Manage the projects, site settings and skills behind a portfolio site")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in as the site owner")]
    Login {
        #[arg(long, help = "Account email")]
        email: String,
        #[arg(long, help = "Password (defaults to PORTFOLIO_ADMIN_PASSWORD)")]
        password: Option<String>,
    },

    #[command(about = "Sign out and forget the local session")]
    Logout,

    #[command(about = "Load every dashboard tab and print it")]
    Dashboard {
        #[arg(long, help = "Only print this tab (projects, settings, skills)")]
        tab: Option<crate::dashboard::Tab>,
    },

    #[command(about = "Manage portfolio projects")]
    Project {
        #[command(subcommand)]
        cmd: commands::project::ProjectCommands,
    },

    #[command(about = "Show or edit the site settings")]
    Settings {
        #[command(subcommand)]
        cmd: commands::settings::SettingsCommands,
    },

    #[command(about = "Manage skills")]
    Skill {
        #[command(subcommand)]
        cmd: commands::skill::SkillCommands,
    },

    #[command(about = "Render the public views as visitors see them")]
    Preview {
        #[command(subcommand)]
        cmd: commands::preview::PreviewCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// A failure the notifier has already shown; `main` exits without printing it again
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Reported(#[from] pub AdminError);

pub trait ReportedExt<T> {
    fn reported(self) -> anyhow::Result<T>;
}

impl<T> ReportedExt<T> for AdminResult<T> {
    fn reported(self) -> anyhow::Result<T> {
        self.map_err(|e| Reported(e).into())
    }
}

/// Mount the dashboard for one command: gate, then load every tab
pub async fn mount(config: &AppConfig, format: OutputFormat, assume_yes: bool) -> anyhow::Result<Dashboard> {
    let (gateways, _) = rest::gateways(config)?;
    let feedback = Feedback::new(
        Arc::new(ConsoleNotifier::new(format)),
        Arc::new(PromptConfirm::new(assume_yes)),
    );
    let mut dashboard = Dashboard::new(gateways, feedback, config.admin.role.clone());

    match dashboard.mount().await {
        Mount::Ready => Ok(dashboard),
        Mount::Redirect(Route::Login) => Err(AdminError::AuthenticationRequired.into()),
        Mount::Redirect(_) => Err(Reported(AdminError::authorization_denied(
            "You don't have admin privileges.",
        ))
        .into()),
    }
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&config, email, password, output_format).await
        }
        Commands::Logout => commands::auth::logout(&config, output_format).await,
        Commands::Dashboard { tab } => commands::dashboard::handle(&config, tab, output_format).await,
        Commands::Project { cmd } => commands::project::handle(cmd, &config, output_format).await,
        Commands::Settings { cmd } => commands::settings::handle(cmd, &config, output_format).await,
        Commands::Skill { cmd } => commands::skill::handle(cmd, &config, output_format).await,
        Commands::Preview { cmd } => commands::preview::handle(cmd, &config, output_format).await,
    }
}
