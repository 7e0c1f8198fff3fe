use std::sync::Arc;

use super::{Feedback, FormMode, FormState, LoadState, Submitted};
use crate::error::{AdminError, AdminResult};
use crate::gateway::{DataGateway, RecordQuery};
use crate::models::{payload_record, Entity};
use crate::types::RecordId;

/// Mirror and dialog for one list-shaped collection.
///
/// The mirror is only ever replaced by a full reload after a successful
/// write; it is never patched locally.
pub struct CollectionController<E: Entity> {
    data: Arc<dyn DataGateway>,
    feedback: Feedback,
    items: Vec<E>,
    load_state: LoadState,
    form: FormState<E::Form>,
}

impl<E: Entity> CollectionController<E> {
    pub fn new(data: Arc<dyn DataGateway>, feedback: Feedback) -> Self {
        Self {
            data,
            feedback,
            items: Vec::new(),
            load_state: LoadState::Idle,
            form: FormState::Closed,
        }
    }

    /// Rows in store order as of the last successful load
    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn find(&self, id: &RecordId) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn form_state(&self) -> &FormState<E::Form> {
        &self.form
    }

    pub fn form(&self) -> Option<&E::Form> {
        self.form.form()
    }

    pub fn form_mut(&mut self) -> Option<&mut E::Form> {
        self.form.form_mut()
    }

    pub(crate) fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    fn plural(&self) -> String {
        format!("{}s", E::LABEL.to_lowercase())
    }

    /// Replace the mirror with the store's ordered rows.
    /// On failure the previous mirror stays as it was.
    pub async fn load(&mut self) -> AdminResult<()> {
        let previous = self.load_state;
        self.load_state = LoadState::Loading;

        match self.fetch().await {
            Ok(items) => {
                tracing::debug!("Loaded {} {}", items.len(), self.plural());
                self.items = items;
                self.load_state = LoadState::Ready;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load {}: {}", self.plural(), e);
                self.load_state = match previous {
                    LoadState::Ready => LoadState::Ready,
                    _ => LoadState::Failed,
                };
                self.feedback.error(format!("Failed to load {}", self.plural()));
                Err(e)
            }
        }
    }

    async fn fetch(&self) -> AdminResult<Vec<E>> {
        let query = RecordQuery::ordered(E::order());
        let rows = self.data.list(E::COLLECTION, &query).await?;
        rows.iter()
            .map(|row| E::from_record(row).map_err(|e| AdminError::malformed(E::COLLECTION, e)))
            .collect()
    }

    /// Open an empty form with the entity's defaults
    pub fn begin_create(&mut self) {
        self.form = FormState::Editing {
            mode: FormMode::New,
            form: E::Form::default(),
        };
    }

    /// Open a form seeded from the mirrored row
    pub fn begin_edit(&mut self, id: &RecordId) -> AdminResult<()> {
        let item = self
            .find(id)
            .ok_or_else(|| AdminError::not_found(format!("{} {}", E::LABEL, id)))?;
        let form = item.to_form();
        self.form = FormState::Editing {
            mode: FormMode::Existing(id.clone()),
            form,
        };
        Ok(())
    }

    /// Close the form and discard staged edits
    pub fn cancel(&mut self) {
        self.form = FormState::Closed;
    }

    /// Validate and write the open form: insert in create mode, full-field
    /// update in edit mode. Success closes the form and reloads the mirror;
    /// failure reports a notice and leaves the form open with its edits.
    pub async fn submit(&mut self) -> AdminResult<Submitted> {
        let (mode, form) = match std::mem::replace(&mut self.form, FormState::Closed) {
            FormState::Editing { mode, form } => (mode, form),
            other => {
                self.form = other;
                return Err(AdminError::validation(format!("No open {} form", E::LABEL.to_lowercase())));
            }
        };

        let payload = match E::payload(&form) {
            Ok(payload) => payload,
            Err(e) => {
                self.feedback.error(e.to_string());
                self.form = FormState::Editing { mode, form };
                return Err(e);
            }
        };

        self.form = FormState::Submitting { mode: mode.clone(), form };
        match self.write(&mode, &payload).await {
            Ok(submitted) => {
                let verb = match submitted {
                    Submitted::Created(_) => "created",
                    Submitted::Updated(_) => "updated",
                };
                self.form = FormState::Closed;
                self.feedback.success(format!("{} {} successfully", E::LABEL, verb));
                // A failed reload reports its own notice; the write stands
                let _ = self.load().await;
                Ok(submitted)
            }
            Err(e) => {
                tracing::error!("Saving {} failed: {}", E::LABEL.to_lowercase(), e);
                self.feedback.error(e.to_string());
                if let FormState::Submitting { mode, form } = std::mem::replace(&mut self.form, FormState::Closed) {
                    self.form = FormState::Editing { mode, form };
                }
                Err(e)
            }
        }
    }

    async fn write(&self, mode: &FormMode, payload: &E::Payload) -> AdminResult<Submitted> {
        let record = payload_record(payload).map_err(|e| AdminError::malformed(E::COLLECTION, e))?;
        match mode {
            FormMode::New => {
                let stored = self.data.insert(E::COLLECTION, record).await?;
                let id = stored.id().map_err(|e| AdminError::malformed(E::COLLECTION, e))?;
                Ok(Submitted::Created(id))
            }
            FormMode::Existing(id) => {
                self.data.update(E::COLLECTION, id, record).await?;
                Ok(Submitted::Updated(id.clone()))
            }
        }
    }

    /// Delete a row after the user confirms. Returns `Ok(false)` when declined.
    pub async fn remove(&mut self, id: &RecordId) -> AdminResult<bool> {
        let label = E::LABEL.to_lowercase();
        let prompt = format!("Are you sure you want to delete this {}?", label);
        if !self.feedback.confirm.confirm(&prompt) {
            tracing::debug!("Delete of {} {} declined", label, id);
            return Ok(false);
        }

        if let Err(e) = self.data.delete(E::COLLECTION, id).await {
            tracing::error!("Deleting {} {} failed: {}", label, id, e);
            self.feedback.error(format!("Failed to delete {}", label));
            return Err(e);
        }

        self.feedback.success(format!("{} deleted successfully", E::LABEL));
        let _ = self.load().await;
        Ok(true)
    }
}
