//! HTTP gateways for a hosted backend that serves records under `/rest/v1`,
//! sessions under `/auth/v1` and objects under `/storage/v1`.

pub mod auth;
pub mod data;
pub mod storage;

use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::{AppConfig, ConfigError};
use crate::error::{AdminError, AdminResult};
use crate::gateway::{Gateways, SessionStore};
use crate::types::{Collection, Operation};

pub use auth::RestAuthGateway;
pub use data::RestDataGateway;
pub use storage::RestStorageGateway;

/// Connection shared by the three HTTP gateways
pub struct RestBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    bucket: String,
    log_requests: bool,
    access_token: RwLock<Option<String>>,
}

impl RestBackend {
    pub fn from_config(config: &AppConfig) -> AdminResult<Self> {
        let base_url = config.backend_url()?;
        let api_key = config.api_key()?;
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        let mut backend = Self::new(base_url.as_str(), api_key, &config.backend.storage_bucket, client);
        backend.log_requests = config.http.log_requests;
        Ok(backend)
    }

    pub fn new(base_url: &str, api_key: &str, bucket: &str, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            bucket: bucket.to_string(),
            log_requests: false,
            access_token: RwLock::new(None),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Absolute URL for a service path such as `rest/v1/projects`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write().await = token;
    }

    /// Attach the API key and the session bearer (falls back to the API key)
    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.access_token.read().await.clone();
        let bearer = token.as_deref().unwrap_or(&self.api_key);
        request.header("apikey", &self.api_key).bearer_auth(bearer)
    }

    fn http(&self) -> &reqwest::Client {
        &self.client
    }

    fn trace(&self, method: &str, url: &str) {
        if self.log_requests {
            tracing::debug!("{} {}", method, url);
        }
    }
}

/// Build the three HTTP gateways around one shared backend connection
pub fn gateways(config: &AppConfig) -> AdminResult<(Gateways, Arc<RestAuthGateway>)> {
    let backend = Arc::new(RestBackend::from_config(config)?);
    let store = SessionStore::new(config.session_file()?);
    let auth = Arc::new(RestAuthGateway::new(backend.clone(), store));
    let data = Arc::new(RestDataGateway::new(backend.clone()));
    let storage = Arc::new(RestStorageGateway::new(backend));
    Ok((Gateways::new(auth.clone(), data, storage), auth))
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// Pull a readable message out of an error body, falling back to the raw text
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok().and_then(|b| {
        b.message.or(b.msg).or(b.error_description).or(b.error)
    });
    match parsed {
        Some(message) => message,
        None if body.trim().is_empty() => status.to_string(),
        None => body.trim().to_string(),
    }
}

/// Map a failed response status onto the error taxonomy
pub fn status_error(status: StatusCode, body: &str, collection: Collection, op: Operation) -> AdminError {
    let message = error_message(status, body);
    match status {
        StatusCode::UNAUTHORIZED => AdminError::AuthenticationRequired,
        StatusCode::FORBIDDEN => AdminError::authorization_denied(message),
        StatusCode::NOT_FOUND => AdminError::not_found(format!("{} in {}", message, collection)),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY
            if op != Operation::Select =>
        {
            AdminError::validation(message)
        }
        _ => AdminError::transient_fetch(collection, format!("{} ({})", message, status)),
    }
}
