use std::sync::Arc;

use super::upload::{upload_image, ImageTarget, UploadFlag};
use super::{Feedback, LoadState, Submitted};
use crate::error::{AdminError, AdminResult};
use crate::gateway::{DataGateway, StorageGateway};
use crate::models::{payload_record, SiteSettings, SiteSettingsForm};
use crate::types::{Collection, RecordId};

/// Whether the singleton row exists in the store, as of the last fetch or write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsState {
    /// No fetch has succeeded yet; saving is refused until one does
    Unknown,
    Unset,
    Existing(RecordId),
}

/// Mirror and always-open form for the site settings singleton
pub struct SettingsController {
    data: Arc<dyn DataGateway>,
    feedback: Feedback,
    current: Option<SiteSettings>,
    state: SettingsState,
    load_state: LoadState,
    form: SiteSettingsForm,
}

impl SettingsController {
    pub fn new(data: Arc<dyn DataGateway>, feedback: Feedback) -> Self {
        Self {
            data,
            feedback,
            current: None,
            state: SettingsState::Unknown,
            load_state: LoadState::Idle,
            form: SiteSettingsForm::default(),
        }
    }

    pub fn current(&self) -> Option<&SiteSettings> {
        self.current.as_ref()
    }

    pub fn state(&self) -> &SettingsState {
        &self.state
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn form(&self) -> &SiteSettingsForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SiteSettingsForm {
        &mut self.form
    }

    /// Fetch the singleton. A present row re-seeds the form; an absent row
    /// marks the state Unset and leaves the form as the user left it.
    pub async fn load(&mut self) -> AdminResult<()> {
        let previous = self.load_state;
        self.load_state = LoadState::Loading;

        let fetched = match self.data.get_singleton(Collection::SiteSettings).await {
            Ok(row) => row
                .map(|row| {
                    SiteSettings::from_record(&row)
                        .map_err(|e| AdminError::malformed(Collection::SiteSettings, e))
                })
                .transpose(),
            Err(e) => Err(e),
        };

        match fetched {
            Ok(Some(settings)) => {
                self.state = match &settings.id {
                    Some(id) => SettingsState::Existing(id.clone()),
                    None => SettingsState::Unset,
                };
                self.form = settings.to_form();
                self.current = Some(settings);
                self.load_state = LoadState::Ready;
                Ok(())
            }
            Ok(None) => {
                tracing::debug!("No site settings row yet");
                self.state = SettingsState::Unset;
                self.current = None;
                self.load_state = LoadState::Ready;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load site settings: {}", e);
                self.load_state = match previous {
                    LoadState::Ready => LoadState::Ready,
                    _ => LoadState::Failed,
                };
                self.feedback.error("Failed to load site settings");
                Err(e)
            }
        }
    }

    /// Insert the row if none exists yet, otherwise update it in place.
    /// Either way the result is re-fetched afterwards.
    pub async fn submit(&mut self) -> AdminResult<Submitted> {
        if self.state == SettingsState::Unknown {
            tracing::warn!("Refusing to save site settings before they have loaded");
            self.feedback
                .error("Site settings have not loaded yet; reload before saving");
            return Err(AdminError::validation("site settings have not been loaded"));
        }

        let payload = self.form.payload();
        let record =
            payload_record(&payload).map_err(|e| AdminError::malformed(Collection::SiteSettings, e))?;

        let result = match &self.state {
            SettingsState::Unknown | SettingsState::Unset => {
                match self.data.insert(Collection::SiteSettings, record).await {
                    Ok(stored) => stored
                        .id()
                        .map(Submitted::Created)
                        .map_err(|e| AdminError::malformed(Collection::SiteSettings, e)),
                    Err(e) => Err(e),
                }
            }
            SettingsState::Existing(id) => self
                .data
                .update(Collection::SiteSettings, id, record)
                .await
                .map(|_| Submitted::Updated(id.clone())),
        };

        match result {
            Ok(submitted) => {
                // Later saves must update rather than insert a second row
                self.state = SettingsState::Existing(submitted.id().clone());
                self.feedback.success("Site settings updated successfully");
                let _ = self.load().await;
                Ok(submitted)
            }
            Err(e) => {
                tracing::error!("Saving site settings failed: {}", e);
                self.feedback.error(e.to_string());
                Err(e)
            }
        }
    }

    /// Upload a hero image and stage its public URL in the form without saving
    pub async fn upload_hero_image(
        &mut self,
        storage: &dyn StorageGateway,
        flag: &UploadFlag,
        filename: &str,
        bytes: Vec<u8>,
    ) -> AdminResult<String> {
        match upload_image(storage, ImageTarget::Hero, flag, filename, bytes).await {
            Ok(url) => {
                self.form.hero_image_url = url.clone();
                self.feedback.success("Image uploaded successfully");
                Ok(url)
            }
            Err(e) => {
                tracing::error!("Hero image upload failed: {}", e);
                self.feedback.error(e.to_string());
                Err(e)
            }
        }
    }
}
