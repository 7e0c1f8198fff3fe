pub mod form;
pub mod project;
pub mod record;
pub mod site_settings;
pub mod skill;

use serde::Serialize;

use crate::error::AdminResult;
use crate::gateway::OrderBy;
use crate::types::{Collection, RecordId};

pub use project::{Project, ProjectForm, ProjectPayload};
pub use record::{Record, RecordError};
pub use site_settings::{SiteSettings, SiteSettingsForm, SiteSettingsPayload};
pub use skill::{group_by_category, Skill, SkillForm, SkillGroup, SkillPayload};

/// A list-shaped entity: decoded from store rows, edited through a flat form
pub trait Entity: Clone + Send + Sync + 'static {
    /// Editable, flattened representation staged while a dialog is open
    type Form: Default + Clone + Send + Sync;
    /// Write body sent to the store
    type Payload: Serialize + Send + Sync;

    const COLLECTION: Collection;
    /// Human name used in notices ("Project", "Skill")
    const LABEL: &'static str;

    /// Display order requested from the store
    fn order() -> Vec<OrderBy>;

    /// Typed decode of a store row
    fn from_record(record: &Record) -> Result<Self, RecordError>;

    fn id(&self) -> &RecordId;

    /// Flatten into editable fields
    fn to_form(&self) -> Self::Form;

    /// Required-field checks and reverse transforms; rejects before any write
    fn payload(form: &Self::Form) -> AdminResult<Self::Payload>;
}

/// Serialize a typed payload into a write record
pub fn payload_record<P: Serialize>(payload: &P) -> Result<Record, RecordError> {
    let value = serde_json::to_value(payload).map_err(|e| RecordError::InvalidJson(e.to_string()))?;
    let mut record = Record::from_json(value)?;
    record.strip_store_fields();
    Ok(record)
}
