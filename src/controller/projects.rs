use super::upload::{upload_image, ImageTarget, UploadFlag};
use super::CollectionController;
use crate::error::{AdminError, AdminResult};
use crate::gateway::StorageGateway;
use crate::models::Project;

pub type ProjectsController = CollectionController<Project>;

impl CollectionController<Project> {
    /// Upload a project image and stage its public URL in the open form.
    /// Nothing is written to the store until the form is submitted.
    pub async fn upload_image(
        &mut self,
        storage: &dyn StorageGateway,
        flag: &UploadFlag,
        filename: &str,
        bytes: Vec<u8>,
    ) -> AdminResult<String> {
        if self.form().is_none() {
            return Err(AdminError::validation("No open project form"));
        }

        match upload_image(storage, ImageTarget::Project, flag, filename, bytes).await {
            Ok(url) => {
                // The form may not be Editing if a submit is in flight
                match self.form_mut() {
                    Some(form) => form.image_url = url.clone(),
                    None => return Err(AdminError::validation("Project form is not editable")),
                }
                self.feedback().success("Image uploaded successfully");
                Ok(url)
            }
            Err(e) => {
                tracing::error!("Project image upload failed: {}", e);
                self.feedback().error(e.to_string());
                Err(e)
            }
        }
    }
}
