use serde::{Deserialize, Serialize};

use super::form::{blank_to_none, join_list, none_to_blank, split_list};
use super::{Entity, Record, RecordError};
use crate::error::{AdminError, AdminResult};
use crate::gateway::OrderBy;
use crate::types::{Collection, RecordId};

/// A portfolio project as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub image_url: Option<String>,
    pub tech_stack: Vec<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub featured: bool,
    pub order_index: i64,
}

/// Project dialog fields, all as the user edits them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub long_description: String,
    pub image_url: String,
    /// Comma-separated tech stack
    pub tech_stack: String,
    pub live_url: String,
    pub github_url: String,
    pub featured: bool,
    pub order_index: i64,
}

/// Full-field write body for insert and update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectPayload {
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub image_url: Option<String>,
    pub tech_stack: Vec<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub featured: bool,
    pub order_index: i64,
}

impl Entity for Project {
    type Form = ProjectForm;
    type Payload = ProjectPayload;

    const COLLECTION: Collection = Collection::Projects;
    const LABEL: &'static str = "Project";

    fn order() -> Vec<OrderBy> {
        vec![OrderBy::asc("order_index")]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            id: record.id()?,
            title: record.require_str("title")?,
            description: record.require_str("description")?,
            long_description: record.opt_str("long_description")?,
            image_url: record.opt_str("image_url")?,
            tech_stack: record.str_list("tech_stack")?,
            live_url: record.opt_str("live_url")?,
            github_url: record.opt_str("github_url")?,
            featured: record.opt_bool("featured")?.unwrap_or(false),
            order_index: record.opt_i64("order_index")?.unwrap_or(0),
        })
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_form(&self) -> ProjectForm {
        ProjectForm {
            title: self.title.clone(),
            description: self.description.clone(),
            long_description: none_to_blank(self.long_description.as_ref()),
            image_url: none_to_blank(self.image_url.as_ref()),
            tech_stack: join_list(&self.tech_stack),
            live_url: none_to_blank(self.live_url.as_ref()),
            github_url: none_to_blank(self.github_url.as_ref()),
            featured: self.featured,
            order_index: self.order_index,
        }
    }

    fn payload(form: &ProjectForm) -> AdminResult<ProjectPayload> {
        if form.title.trim().is_empty() {
            return Err(AdminError::validation("Title is required"));
        }
        if form.description.trim().is_empty() {
            return Err(AdminError::validation("Description is required"));
        }
        let tech_stack = split_list(&form.tech_stack);
        if tech_stack.is_empty() {
            return Err(AdminError::validation("At least one tech stack entry is required"));
        }

        Ok(ProjectPayload {
            title: form.title.clone(),
            description: form.description.clone(),
            long_description: blank_to_none(&form.long_description),
            image_url: blank_to_none(&form.image_url),
            tech_stack,
            live_url: blank_to_none(&form.live_url),
            github_url: blank_to_none(&form.github_url),
            featured: form.featured,
            order_index: form.order_index,
        })
    }
}
