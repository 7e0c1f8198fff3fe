use clap::{Args, Subcommand};

use super::dashboard::{id_data, render_skill_groups};
use crate::cli::utils::{output_data, output_success};
use crate::cli::{mount, OutputFormat, ReportedExt};
use crate::config::AppConfig;
use crate::dashboard::{Dashboard, Tab};
use crate::models::SkillForm;
use crate::types::RecordId;

#[derive(Subcommand)]
pub enum SkillCommands {
    #[command(about = "List skills grouped by category")]
    List,

    #[command(about = "Create a skill")]
    Create {
        #[command(flatten)]
        fields: SkillFields,
    },

    #[command(about = "Update a skill; unspecified fields keep their values")]
    Update {
        #[arg(help = "Skill ID")]
        id: String,
        #[command(flatten)]
        fields: SkillFields,
    },

    #[command(about = "Delete a skill")]
    Delete {
        #[arg(help = "Skill ID")]
        id: String,
        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct SkillFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long, allow_negative_numbers = true, help = "0 to 100 (new skills default to 80)")]
    pub proficiency: Option<i64>,
    #[arg(long)]
    pub order_index: Option<i64>,
}

impl SkillFields {
    pub fn apply(&self, form: &mut SkillForm) {
        if let Some(name) = &self.name {
            form.name = name.clone();
        }
        if let Some(category) = &self.category {
            form.category = category.clone();
        }
        if let Some(proficiency) = self.proficiency {
            form.proficiency = proficiency;
        }
        if let Some(order_index) = self.order_index {
            form.order_index = order_index;
        }
    }
}

pub async fn handle(cmd: SkillCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let assume_yes = matches!(cmd, SkillCommands::Delete { yes: true, .. });
    let mut dashboard = mount(config, output_format, assume_yes).await?;
    dashboard.select_tab(Tab::Skills);

    match cmd {
        SkillCommands::List => {
            let groups = dashboard.skills.groups();
            output_data(&output_format, serde_json::to_value(&groups)?, || {
                render_skill_groups(&groups)
            })
        }
        SkillCommands::Create { fields } => {
            dashboard.skills.begin_create();
            save(&mut dashboard, &fields, output_format).await
        }
        SkillCommands::Update { id, fields } => {
            dashboard.skills.begin_edit(&RecordId::new(id))?;
            save(&mut dashboard, &fields, output_format).await
        }
        SkillCommands::Delete { id, .. } => {
            let id = RecordId::new(id);
            if dashboard.skills.remove(&id).await.reported()? {
                output_success(&output_format, "Skill deleted", Some(id_data(&id)))
            } else {
                output_success(&output_format, "Delete cancelled", None)
            }
        }
    }
}

async fn save(dashboard: &mut Dashboard, fields: &SkillFields, output_format: OutputFormat) -> anyhow::Result<()> {
    if let Some(form) = dashboard.skills.form_mut() {
        fields.apply(form);
    }
    let submitted = dashboard.skills.submit().await.reported()?;
    output_success(&output_format, "Skill saved", Some(id_data(submitted.id())))
}
