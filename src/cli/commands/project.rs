use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use super::dashboard::{id_data, render_projects};
use crate::cli::utils::{output_data, output_success};
use crate::cli::{mount, OutputFormat, ReportedExt};
use crate::config::AppConfig;
use crate::dashboard::{Dashboard, Tab};
use crate::models::ProjectForm;
use crate::types::RecordId;

#[derive(Subcommand)]
pub enum ProjectCommands {
    #[command(about = "List projects in display order")]
    List,

    #[command(about = "Create a project")]
    Create {
        #[command(flatten)]
        fields: ProjectFields,
    },

    #[command(about = "Update a project; unspecified fields keep their values")]
    Update {
        #[arg(help = "Project ID")]
        id: String,
        #[command(flatten)]
        fields: ProjectFields,
    },

    #[command(about = "Delete a project")]
    Delete {
        #[arg(help = "Project ID")]
        id: String,
        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ProjectFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub long_description: Option<String>,
    #[arg(long, help = "Image URL; use --image to upload a file instead")]
    pub image_url: Option<String>,
    #[arg(long, help = "Comma-separated technologies")]
    pub tech_stack: Option<String>,
    #[arg(long)]
    pub live_url: Option<String>,
    #[arg(long)]
    pub github_url: Option<String>,
    #[arg(long)]
    pub featured: Option<bool>,
    #[arg(long)]
    pub order_index: Option<i64>,
    #[arg(long, help = "Upload this image file and use it for the project")]
    pub image: Option<PathBuf>,
}

impl ProjectFields {
    /// Overlay the given flags on the staged form
    pub fn apply(&self, form: &mut ProjectForm) {
        let text = [
            (&self.title, &mut form.title),
            (&self.description, &mut form.description),
            (&self.long_description, &mut form.long_description),
            (&self.image_url, &mut form.image_url),
            (&self.tech_stack, &mut form.tech_stack),
            (&self.live_url, &mut form.live_url),
            (&self.github_url, &mut form.github_url),
        ];
        for (flag, field) in text {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }
        if let Some(featured) = self.featured {
            form.featured = featured;
        }
        if let Some(order_index) = self.order_index {
            form.order_index = order_index;
        }
    }
}

/// Read a local file for upload, keeping its name for the extension
pub async fn read_image(path: &Path) -> anyhow::Result<(String, Vec<u8>)> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", path.display(), e))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    Ok((name, bytes))
}

pub async fn handle(cmd: ProjectCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let assume_yes = matches!(cmd, ProjectCommands::Delete { yes: true, .. });
    let mut dashboard = mount(config, output_format, assume_yes).await?;
    dashboard.select_tab(Tab::Projects);

    match cmd {
        ProjectCommands::List => {
            let items = dashboard.projects.items();
            output_data(&output_format, serde_json::to_value(items)?, || render_projects(items))
        }
        ProjectCommands::Create { fields } => {
            dashboard.projects.begin_create();
            save(&mut dashboard, &fields, output_format).await
        }
        ProjectCommands::Update { id, fields } => {
            dashboard.projects.begin_edit(&RecordId::new(id))?;
            save(&mut dashboard, &fields, output_format).await
        }
        ProjectCommands::Delete { id, .. } => {
            let id = RecordId::new(id);
            if dashboard.projects.remove(&id).await.reported()? {
                output_success(&output_format, "Project deleted", Some(id_data(&id)))
            } else {
                output_success(&output_format, "Delete cancelled", None)
            }
        }
    }
}

async fn save(dashboard: &mut Dashboard, fields: &ProjectFields, output_format: OutputFormat) -> anyhow::Result<()> {
    if let Some(form) = dashboard.projects.form_mut() {
        fields.apply(form);
    }

    if let Some(path) = &fields.image {
        let (name, bytes) = read_image(path).await?;
        let storage = dashboard.gateways().storage.clone();
        let flag = dashboard.project_upload.clone();
        dashboard
            .projects
            .upload_image(storage.as_ref(), &flag, &name, bytes)
            .await
            .reported()?;
    }

    let submitted = dashboard.projects.submit().await.reported()?;
    output_success(&output_format, "Project saved", Some(id_data(submitted.id())))
}
