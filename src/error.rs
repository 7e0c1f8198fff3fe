// Admin error taxonomy
use thiserror::Error;

use crate::config::ConfigError;
use crate::models::RecordError;
use crate::types::Collection;

/// Every failure the admin core can report, grouped by how the dashboard reacts to it
#[derive(Debug, Error)]
pub enum AdminError {
    // Session guard failures, fatal to the dashboard mount
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Access denied: {0}")]
    AuthorizationDenied(String),

    /// The sign-in or refresh call itself failed, as opposed to being refused
    #[error("Authentication request failed: {0}")]
    AuthRequest(String),

    // Entity controller failures, surfaced as notices
    #[error("Failed to load {collection}: {message}")]
    TransientFetch {
        collection: Collection,
        message: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Malformed {collection} record: {source}")]
    MalformedRecord {
        collection: Collection,
        #[source]
        source: RecordError,
    },

    #[error("Session storage error: {0}")]
    SessionStorage(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AdminError {
    /// Stable code for machine-readable output
    pub fn error_code(&self) -> &'static str {
        match self {
            AdminError::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            AdminError::AuthorizationDenied(_) => "AUTHORIZATION_DENIED",
            AdminError::AuthRequest(_) => "AUTH_REQUEST_ERROR",
            AdminError::TransientFetch { .. } => "TRANSIENT_FETCH_ERROR",
            AdminError::Validation(_) => "VALIDATION_ERROR",
            AdminError::NotFound(_) => "NOT_FOUND",
            AdminError::Upload(_) => "UPLOAD_ERROR",
            AdminError::MalformedRecord { .. } => "MALFORMED_RECORD",
            AdminError::SessionStorage(_) => "SESSION_STORAGE_ERROR",
            AdminError::Config(_) => "CONFIG_ERROR",
        }
    }
}

// Static constructor methods
impl AdminError {
    pub fn authorization_denied(message: impl Into<String>) -> Self {
        AdminError::AuthorizationDenied(message.into())
    }

    pub fn auth_request(message: impl Into<String>) -> Self {
        AdminError::AuthRequest(message.into())
    }

    pub fn transient_fetch(collection: Collection, message: impl Into<String>) -> Self {
        AdminError::TransientFetch {
            collection,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AdminError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AdminError::NotFound(message.into())
    }

    pub fn upload(message: impl Into<String>) -> Self {
        AdminError::Upload(message.into())
    }

    pub fn session_storage(message: impl Into<String>) -> Self {
        AdminError::SessionStorage(message.into())
    }

    pub fn malformed(collection: Collection, source: RecordError) -> Self {
        AdminError::MalformedRecord { collection, source }
    }
}

pub type AdminResult<T> = Result<T, AdminError>;
