use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AdminError, AdminResult};

/// A signed-in session as persisted between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Expired, or about to expire within the given margin
    pub fn is_expired(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now + margin,
            None => false,
        }
    }
}

/// Claims read from an access token
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub exp: Option<i64>,
    pub email: Option<String>,
}

impl TokenClaims {
    /// Read claims without checking the signature; the backend verifies tokens
    pub fn peek(token: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;
        Ok(data.claims)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }
}

/// JSON file holding the current session
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> AdminResult<Option<Session>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                tracing::warn!("Failed to read session file {}: {}", self.path.display(), e);
                return Ok(None);
            }
        };

        match serde_json::from_str::<Session>(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    pub async fn save(&self, session: &Session) -> AdminResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AdminError::session_storage(format!("cannot create {}: {}", parent.display(), e)))?;
        }
        let content = serde_json::to_string_pretty(session)
            .map_err(|e| AdminError::session_storage(format!("cannot encode session: {}", e)))?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| AdminError::session_storage(format!("cannot write {}: {}", self.path.display(), e)))?;
        tracing::debug!("Saved session for {} to {}", session.user_id, self.path.display());
        Ok(())
    }

    pub async fn clear(&self) -> AdminResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AdminError::session_storage(format!(
                "cannot remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn token(claims: serde_json::Value) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"backend-secret")).unwrap()
    }

    #[test]
    fn peeks_claims_without_the_secret() {
        let exp = Utc::now().timestamp() + 3600;
        let claims = TokenClaims::peek(&token(json!({
            "sub": "user-1",
            "exp": exp,
            "aud": "authenticated",
            "email": "owner@example.com"
        })))
        .unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email.as_deref(), Some("owner@example.com"));
        assert_eq!(claims.expires_at().unwrap().timestamp(), exp);
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        assert!(TokenClaims::peek("not-a-token").is_err());
    }

    #[test]
    fn expiry_uses_margin() {
        let now = Utc::now();
        let session = Session {
            user_id: "u".to_string(),
            email: None,
            access_token: "t".to_string(),
            refresh_token: None,
            expires_at: Some(now + Duration::seconds(5)),
        };
        assert!(!session.is_expired(now, Duration::zero()));
        assert!(session.is_expired(now, Duration::seconds(10)));
    }

    #[tokio::test]
    async fn store_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));
        assert_eq!(store.load().await.unwrap(), None);

        let session = Session {
            user_id: "user-1".to_string(),
            email: Some("owner@example.com".to_string()),
            access_token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: None,
        };
        store.save(&session).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(session));

        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }
}
