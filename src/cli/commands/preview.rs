use clap::Subcommand;

use super::dashboard::render_projects;
use crate::cli::utils::{field_line, output_data};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::gateway::rest;
use crate::public::{home_profile, public_projects, HomeProfile};

#[derive(Subcommand)]
pub enum PreviewCommands {
    #[command(about = "The home page hero with defaults filled in")]
    Home,

    #[command(about = "The public projects listing")]
    Projects {
        #[arg(long, help = "Only featured projects")]
        featured: bool,
    },
}

/// Public reads go out with the API key only; no sign-in needed
pub async fn handle(cmd: PreviewCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let (gateways, _) = rest::gateways(config)?;

    match cmd {
        PreviewCommands::Home => {
            let profile = home_profile(gateways.data.as_ref()).await;
            output_data(&output_format, serde_json::to_value(&profile)?, || render_home(&profile))
        }
        PreviewCommands::Projects { featured } => {
            let projects = public_projects(gateways.data.as_ref(), featured).await?;
            output_data(&output_format, serde_json::to_value(&projects)?, || {
                render_projects(&projects)
            })
        }
    }
}

fn render_home(profile: &HomeProfile) -> String {
    let mut lines = vec![profile.hero_title.clone(), profile.hero_subtitle.clone()];
    lines.extend(field_line("Image", profile.hero_image_url.as_deref()));
    if let Some(bio) = &profile.bio {
        lines.push(String::new());
        lines.push(bio.clone());
    }
    if let Some(contact) = &profile.contact {
        lines.push(String::new());
        lines.extend(field_line("Location", contact.location.as_deref()));
        lines.extend(field_line("Availability", contact.availability.as_deref()));
        lines.extend(field_line("Email", contact.email.as_deref()));
    }
    lines.push(String::new());
    for link in &profile.social_links {
        lines.extend(field_line(link.label, Some(link.url.as_str())));
    }
    lines.join("\n")
}
