use async_trait::async_trait;
use std::sync::Arc;

use super::RestBackend;
use crate::error::{AdminError, AdminResult};
use crate::gateway::StorageGateway;

/// Object storage over `/storage/v1/object/{bucket}`
pub struct RestStorageGateway {
    backend: Arc<RestBackend>,
}

impl RestStorageGateway {
    pub fn new(backend: Arc<RestBackend>) -> Self {
        Self { backend }
    }
}

/// Content type from the file extension; images only, anything else is opaque bytes
pub fn content_type(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl StorageGateway for RestStorageGateway {
    async fn upload(&self, namespace: &str, filename: &str, bytes: Vec<u8>) -> AdminResult<String> {
        let path = format!("{}/{}", namespace, filename);
        let url = self
            .backend
            .endpoint(&format!("storage/v1/object/{}/{}", self.backend.bucket(), path));
        self.backend.trace("POST", &url);

        let size = bytes.len();
        let request = self
            .backend
            .http()
            .post(&url)
            .header("Content-Type", content_type(&path))
            .header("x-upsert", "false")
            .body(bytes);
        let response = self
            .backend
            .authorize(request)
            .await
            .send()
            .await
            .map_err(|e| AdminError::upload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Upload of {} failed with {}: {}", path, status, body);
            return Err(AdminError::upload(super::error_message(status, &body)));
        }

        tracing::info!("Uploaded {} ({} bytes)", path, size);
        Ok(path)
    }

    fn public_url(&self, path: &str) -> String {
        self.backend.endpoint(&format!(
            "storage/v1/object/public/{}/{}",
            self.backend.bucket(),
            path.trim_start_matches('/')
        ))
    }
}
