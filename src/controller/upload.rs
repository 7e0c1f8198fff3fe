use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AdminResult;
use crate::gateway::StorageGateway;

const TOKEN_LEN: usize = 11;

/// Which image field an upload fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    Project,
    Hero,
}

impl ImageTarget {
    /// Storage namespace for the target
    pub fn namespace(&self) -> &'static str {
        match self {
            ImageTarget::Project => "projects",
            ImageTarget::Hero => "hero",
        }
    }
}

/// Stored name: `<random token>-<unix millis>.<original extension>`.
/// A name without a dot keeps the whole name as its "extension".
pub fn unique_filename(original: &str, now: DateTime<Utc>) -> String {
    let name = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(original);
    let ext = name.rsplit('.').next().unwrap_or(name);
    let token = Uuid::new_v4().simple().to_string();
    format!("{}-{}.{}", &token[..TOKEN_LEN], now.timestamp_millis(), ext)
}

/// Shared "uploading" flag for one image input; true while an upload is in flight
#[derive(Debug, Clone, Default)]
pub struct UploadFlag(Arc<AtomicBool>);

impl UploadFlag {
    pub fn is_uploading(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Raise the flag until the returned guard drops
    fn raise(&self) -> UploadGuard {
        self.0.store(true, Ordering::SeqCst);
        UploadGuard(self.0.clone())
    }
}

struct UploadGuard(Arc<AtomicBool>);

impl Drop for UploadGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Upload an image under the target's namespace and return its public URL.
/// The flag is raised for the duration and cleared on success and failure alike.
pub async fn upload_image(
    storage: &dyn StorageGateway,
    target: ImageTarget,
    flag: &UploadFlag,
    original_name: &str,
    bytes: Vec<u8>,
) -> AdminResult<String> {
    let _guard = flag.raise();
    let filename = unique_filename(original_name, Utc::now());
    let path = storage.upload(target.namespace(), &filename, bytes).await?;
    Ok(storage.public_url(&path))
}
