use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid backend URL: {0}")]
    InvalidBackendUrl(String),

    #[error("Cannot build HTTP client: {0}")]
    HttpClient(String),
}

/// Application configuration, built once in `main` and passed down explicitly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub backend: BackendConfig,
    pub admin: AdminConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL hosting the rest, auth and storage services
    pub url: Option<String>,
    /// Public API key sent with every request
    pub api_key: Option<String>,
    pub storage_bucket: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Role name the session guard requires
    pub role: String,
    /// Where the signed-in session is persisted between runs
    pub session_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub log_requests: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Backend overrides
        if let Ok(v) = env::var("PORTFOLIO_BACKEND_URL") {
            self.backend.url = Some(v.trim_end_matches('/').to_string());
        }
        if let Ok(v) = env::var("PORTFOLIO_API_KEY") {
            self.backend.api_key = Some(v);
        }
        if let Ok(v) = env::var("PORTFOLIO_STORAGE_BUCKET") {
            self.backend.storage_bucket = v;
        }

        // Admin overrides
        if let Ok(v) = env::var("PORTFOLIO_ADMIN_ROLE") {
            self.admin.role = v;
        }
        if let Ok(v) = env::var("PORTFOLIO_SESSION_FILE") {
            self.admin.session_file = Some(PathBuf::from(v));
        }

        // HTTP overrides
        if let Ok(v) = env::var("PORTFOLIO_HTTP_TIMEOUT_SECS") {
            self.http.timeout_secs = v.parse().unwrap_or(self.http.timeout_secs);
        }
        if let Ok(v) = env::var("PORTFOLIO_LOG_REQUESTS") {
            self.http.log_requests = v.parse().unwrap_or(self.http.log_requests);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            backend: BackendConfig::default(),
            admin: AdminConfig::default(),
            http: HttpConfig {
                timeout_secs: 30,
                log_requests: true,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            backend: BackendConfig::default(),
            admin: AdminConfig::default(),
            http: HttpConfig {
                timeout_secs: 15,
                log_requests: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            backend: BackendConfig::default(),
            admin: AdminConfig::default(),
            http: HttpConfig {
                timeout_secs: 10,
                log_requests: false,
            },
        }
    }

    /// Base URL of the hosted backend, parsed
    pub fn backend_url(&self) -> Result<url::Url, ConfigError> {
        let raw = self
            .backend
            .url
            .as_deref()
            .ok_or(ConfigError::Missing("PORTFOLIO_BACKEND_URL"))?;
        url::Url::parse(raw).map_err(|_| ConfigError::InvalidBackendUrl(raw.to_string()))
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.backend
            .api_key
            .as_deref()
            .ok_or(ConfigError::Missing("PORTFOLIO_API_KEY"))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    /// Session file path, defaulting to ~/.config/portfolio-admin/session.json
    pub fn session_file(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.admin.session_file {
            return Ok(path.clone());
        }
        let home = env::var("HOME").map_err(|_| ConfigError::Missing("HOME"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("portfolio-admin")
            .join("session.json"))
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            storage_bucket: "site-images".to_string(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            role: "admin".to_string(),
            session_file: None,
        }
    }
}
