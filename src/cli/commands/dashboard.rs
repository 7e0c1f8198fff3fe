use serde_json::{json, Map, Value};

use crate::cli::utils::{field_line, output_data};
use crate::cli::{mount, OutputFormat};
use crate::config::AppConfig;
use crate::dashboard::{Dashboard, Tab};
use crate::models::{Project, SiteSettings, SkillGroup};

pub async fn handle(config: &AppConfig, tab: Option<Tab>, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut dashboard = mount(config, output_format, false).await?;
    let tabs: Vec<Tab> = match tab {
        Some(tab) => {
            dashboard.select_tab(tab);
            vec![tab]
        }
        None => Tab::ALL.to_vec(),
    };

    let mut data = Map::new();
    let mut sections = Vec::new();
    for tab in tabs {
        let (value, text) = render_tab(&dashboard, tab)?;
        data.insert(tab.as_str().to_string(), value);
        sections.push(text);
    }

    output_data(&output_format, Value::Object(data), || sections.join("\n\n"))
}

fn render_tab(dashboard: &Dashboard, tab: Tab) -> anyhow::Result<(Value, String)> {
    Ok(match tab {
        Tab::Projects => {
            let items = dashboard.projects.items();
            (serde_json::to_value(items)?, render_projects(items))
        }
        Tab::Settings => {
            let current = dashboard.settings.current();
            (serde_json::to_value(current)?, render_settings(current))
        }
        Tab::Skills => {
            let groups = dashboard.skills.groups();
            (serde_json::to_value(&groups)?, render_skill_groups(&groups))
        }
    })
}

pub fn render_projects(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects yet".to_string();
    }

    let mut lines = vec![format!("Projects ({})", projects.len())];
    for project in projects {
        let star = if project.featured { " *" } else { "" };
        lines.push(format!("[{}] {}{} ({})", project.order_index, project.title, star, project.id));
        lines.push(format!("  {}", project.description));
        if !project.tech_stack.is_empty() {
            lines.push(format!("  Tech: {}", project.tech_stack.join(", ")));
        }
        lines.extend(field_line("Live", project.live_url.as_deref()));
        lines.extend(field_line("Source", project.github_url.as_deref()));
        lines.extend(field_line("Image", project.image_url.as_deref()));
    }
    lines.join("\n")
}

pub fn render_settings(settings: Option<&SiteSettings>) -> String {
    let Some(settings) = settings else {
        return "Site settings have not been saved yet".to_string();
    };

    let mut lines = vec!["Site settings".to_string()];
    let fields = [
        ("Hero title", &settings.hero_title),
        ("Hero subtitle", &settings.hero_subtitle),
        ("Hero image", &settings.hero_image_url),
        ("Bio", &settings.bio),
        ("Location", &settings.location),
        ("Availability", &settings.availability),
        ("Email", &settings.email),
        ("GitHub", &settings.github_url),
        ("LinkedIn", &settings.linkedin_url),
        ("Twitter", &settings.twitter_url),
    ];
    for (label, value) in fields {
        lines.extend(field_line(label, value.as_deref()));
    }
    lines.join("\n")
}

pub fn render_skill_groups(groups: &[SkillGroup]) -> String {
    if groups.is_empty() {
        return "No skills yet".to_string();
    }

    let mut lines = Vec::new();
    for group in groups {
        lines.push(group.category.clone());
        for skill in &group.skills {
            lines.push(format!("  {:<24} {:>3}%  ({})", skill.name, skill.proficiency, skill.id));
        }
    }
    lines.join("\n")
}

/// JSON for a submitted record id
pub fn id_data(id: &crate::types::RecordId) -> Value {
    json!({ "id": id })
}
