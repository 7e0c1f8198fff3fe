use clap::{Args, Subcommand};
use std::path::PathBuf;

use super::dashboard::{id_data, render_settings};
use super::project::read_image;
use crate::cli::utils::{output_data, output_success};
use crate::cli::{mount, OutputFormat, Reported, ReportedExt};
use crate::config::AppConfig;
use crate::controller::SettingsState;
use crate::dashboard::Tab;
use crate::error::AdminError;
use crate::models::SiteSettingsForm;

#[derive(Subcommand)]
pub enum SettingsCommands {
    #[command(about = "Show the saved site settings")]
    Show,

    #[command(about = "Change site settings; pass an empty value to clear a field")]
    Set {
        #[command(flatten)]
        fields: SettingsFields,
    },
}

#[derive(Args, Debug, Default)]
pub struct SettingsFields {
    #[arg(long)]
    pub hero_title: Option<String>,
    #[arg(long)]
    pub hero_subtitle: Option<String>,
    #[arg(long)]
    pub hero_image_url: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub availability: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub github_url: Option<String>,
    #[arg(long)]
    pub linkedin_url: Option<String>,
    #[arg(long)]
    pub twitter_url: Option<String>,
    #[arg(long, help = "Upload this image file as the hero image")]
    pub hero_image: Option<PathBuf>,
}

impl SettingsFields {
    pub fn apply(&self, form: &mut SiteSettingsForm) {
        let fields = [
            (&self.hero_title, &mut form.hero_title),
            (&self.hero_subtitle, &mut form.hero_subtitle),
            (&self.hero_image_url, &mut form.hero_image_url),
            (&self.bio, &mut form.bio),
            (&self.location, &mut form.location),
            (&self.availability, &mut form.availability),
            (&self.email, &mut form.email),
            (&self.github_url, &mut form.github_url),
            (&self.linkedin_url, &mut form.linkedin_url),
            (&self.twitter_url, &mut form.twitter_url),
        ];
        for (flag, field) in fields {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }
    }
}

pub async fn handle(cmd: SettingsCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut dashboard = mount(config, output_format, false).await?;
    dashboard.select_tab(Tab::Settings);

    match cmd {
        SettingsCommands::Show => {
            let current = dashboard.settings.current();
            output_data(&output_format, serde_json::to_value(current)?, || {
                render_settings(current)
            })
        }
        SettingsCommands::Set { fields } => {
            // The failed load was already reported; saving now could insert a second row
            if dashboard.settings.state() == &SettingsState::Unknown {
                return Err(Reported(AdminError::validation("site settings have not been loaded")).into());
            }
            fields.apply(dashboard.settings.form_mut());

            if let Some(path) = &fields.hero_image {
                let (name, bytes) = read_image(path).await?;
                let storage = dashboard.gateways().storage.clone();
                let flag = dashboard.hero_upload.clone();
                dashboard
                    .settings
                    .upload_hero_image(storage.as_ref(), &flag, &name, bytes)
                    .await
                    .reported()?;
            }

            let submitted = dashboard.settings.submit().await.reported()?;
            output_success(&output_format, "Site settings saved", Some(id_data(submitted.id())))
        }
    }
}
