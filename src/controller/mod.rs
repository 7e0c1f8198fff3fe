//! Entity controllers: one read-through mirror per collection, a staged form,
//! and submit/delete orchestration against the gateways.
//!
//! Failures never escape as panics or aborts. Every operation reports its
//! outcome through the [`Notifier`] and also returns it so callers can react.

pub mod collection;
pub mod projects;
pub mod settings;
pub mod skills;
pub mod upload;

use serde::Serialize;
use std::sync::Arc;

use crate::types::RecordId;

pub use collection::CollectionController;
pub use projects::ProjectsController;
pub use settings::{SettingsController, SettingsState};
pub use skills::SkillsController;
pub use upload::{ImageTarget, UploadFlag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A short user-visible message (the dashboard's toast)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: "Success".to_string(),
            description: description.into(),
            level: NoticeLevel::Success,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
            level: NoticeLevel::Error,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Shows notices to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Asks the user to confirm a destructive action
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// The user-facing seams every controller reports through
#[derive(Clone)]
pub struct Feedback {
    pub notifier: Arc<dyn Notifier>,
    pub confirm: Arc<dyn Confirm>,
}

impl Feedback {
    pub fn new(notifier: Arc<dyn Notifier>, confirm: Arc<dyn Confirm>) -> Self {
        Self { notifier, confirm }
    }

    pub fn success(&self, description: impl Into<String>) {
        self.notifier.notify(Notice::success(description));
    }

    pub fn error(&self, description: impl Into<String>) {
        self.notifier.notify(Notice::error(description));
    }
}

/// Initial-load lifecycle of a mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    /// First load failed; nothing has been fetched yet
    Failed,
}

/// Whether the open form creates a record or edits an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    New,
    Existing(RecordId),
}

/// Dialog sub-machine: Closed -> Editing -> Submitting -> Closed
#[derive(Debug, Clone, PartialEq)]
pub enum FormState<F> {
    Closed,
    Editing { mode: FormMode, form: F },
    Submitting { mode: FormMode, form: F },
}

impl<F> FormState<F> {
    pub fn is_open(&self) -> bool {
        !matches!(self, FormState::Closed)
    }

    pub fn mode(&self) -> Option<&FormMode> {
        match self {
            FormState::Closed => None,
            FormState::Editing { mode, .. } | FormState::Submitting { mode, .. } => Some(mode),
        }
    }

    pub fn form(&self) -> Option<&F> {
        match self {
            FormState::Closed => None,
            FormState::Editing { form, .. } | FormState::Submitting { form, .. } => Some(form),
        }
    }

    /// Staged fields are editable only while Editing
    pub fn form_mut(&mut self) -> Option<&mut F> {
        match self {
            FormState::Editing { form, .. } => Some(form),
            _ => None,
        }
    }
}

/// Outcome of a successful submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    Created(RecordId),
    Updated(RecordId),
}

impl Submitted {
    pub fn id(&self) -> &RecordId {
        match self {
            Submitted::Created(id) | Submitted::Updated(id) => id,
        }
    }
}
