use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::{status_error, RestBackend, RestDataGateway};
use crate::error::{AdminError, AdminResult};
use crate::gateway::session::TokenClaims;
use crate::gateway::{AuthGateway, DataGateway, RecordQuery, Session, SessionStore};
use crate::types::{Collection, Operation};

/// Refresh a session this close to its expiry
const EXPIRY_MARGIN_SECS: i64 = 30;

/// Session handling over `/auth/v1`, persisted in a local session file
pub struct RestAuthGateway {
    backend: Arc<RestBackend>,
    store: SessionStore,
    roles: RestDataGateway,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    expires_at: Option<i64>,
    user: Option<TokenUser>,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: String,
    email: Option<String>,
}

impl TokenResponse {
    fn into_session(self) -> AdminResult<Session> {
        let claims = TokenClaims::peek(&self.access_token).ok();
        let user_id = self
            .user
            .as_ref()
            .map(|u| u.id.clone())
            .or_else(|| claims.as_ref().map(|c| c.sub.clone()))
            .ok_or_else(|| AdminError::validation("token response carries no user id"))?;
        let email = self
            .user
            .and_then(|u| u.email)
            .or_else(|| claims.as_ref().and_then(|c| c.email.clone()));
        let expires_at = self
            .expires_at
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .or_else(|| self.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)))
            .or_else(|| claims.as_ref().and_then(TokenClaims::expires_at));

        Ok(Session {
            user_id,
            email,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
        })
    }
}

impl RestAuthGateway {
    pub fn new(backend: Arc<RestBackend>, store: SessionStore) -> Self {
        let roles = RestDataGateway::new(backend.clone());
        Self { backend, store, roles }
    }

    /// Exchange email and password for a session and persist it
    pub async fn sign_in(&self, email: &str, password: &str) -> AdminResult<Session> {
        let session = self
            .token_grant("password", json!({ "email": email, "password": password }))
            .await?;
        self.store.save(&session).await?;
        self.backend.set_access_token(Some(session.access_token.clone())).await;
        tracing::info!("Signed in as {} ({})", email, session.user_id);
        Ok(session)
    }

    async fn token_grant(&self, grant_type: &str, body: serde_json::Value) -> AdminResult<Session> {
        let url = self.backend.endpoint("auth/v1/token");
        self.backend.trace("POST", &url);

        let response = self
            .backend
            .http()
            .post(&url)
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.backend.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Token grant '{}' request failed: {}", grant_type, e);
                AdminError::auth_request(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Token grant '{}' rejected with {}", grant_type, status);
            return Err(match status_error(status, &body, Collection::UserRoles, Operation::Create) {
                AdminError::Validation(_) => AdminError::AuthenticationRequired,
                AdminError::TransientFetch { message, .. } => AdminError::auth_request(message),
                AdminError::NotFound(_) => AdminError::auth_request(format!("token endpoint returned {}", status)),
                other => other,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AdminError::validation(format!("invalid token response: {}", e)))?;
        token.into_session()
    }

    async fn refresh(&self, session: &Session) -> Option<Session> {
        let refresh_token = session.refresh_token.as_deref()?;
        match self
            .token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
        {
            Ok(refreshed) => {
                if let Err(e) = self.store.save(&refreshed).await {
                    tracing::warn!("Refreshed session could not be saved: {}", e);
                }
                tracing::debug!("Refreshed session for {}", refreshed.user_id);
                Some(refreshed)
            }
            Err(e) => {
                tracing::warn!("Session refresh failed: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl AuthGateway for RestAuthGateway {
    async fn get_session(&self) -> AdminResult<Option<Session>> {
        let Some(mut session) = self.store.load().await? else {
            return Ok(None);
        };

        // Token claims are authoritative for identity and expiry
        match TokenClaims::peek(&session.access_token) {
            Ok(claims) => {
                session.user_id = claims.sub.clone();
                if let Some(expires_at) = claims.expires_at() {
                    session.expires_at = Some(expires_at);
                }
            }
            Err(e) => {
                tracing::warn!("Stored access token is unreadable: {}", e);
                return Ok(None);
            }
        }

        if session.is_expired(Utc::now(), Duration::seconds(EXPIRY_MARGIN_SECS)) {
            match self.refresh(&session).await {
                Some(refreshed) => session = refreshed,
                None => return Ok(None),
            }
        }

        self.backend.set_access_token(Some(session.access_token.clone())).await;
        Ok(Some(session))
    }

    async fn has_role(&self, user_id: &str, role: &str) -> AdminResult<bool> {
        let query = RecordQuery::default()
            .eq("user_id", user_id)
            .eq("role", role)
            .limit(1);
        let rows = self.roles.list(Collection::UserRoles, &query).await?;
        Ok(!rows.is_empty())
    }

    async fn sign_out(&self) -> AdminResult<()> {
        let url = self.backend.endpoint("auth/v1/logout");
        self.backend.trace("POST", &url);

        let request = self.backend.http().post(&url);
        match self.backend.authorize(request).await.send().await {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!("Logout returned {}; clearing local session anyway", response.status());
            }
            Err(e) => tracing::warn!("Logout request failed: {}; clearing local session anyway", e),
            Ok(_) => {}
        }

        self.backend.set_access_token(None).await;
        self.store.clear().await?;
        tracing::info!("Signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_prefers_explicit_user() {
        let response = TokenResponse {
            access_token: "opaque".to_string(),
            refresh_token: Some("r".to_string()),
            expires_in: Some(3600),
            expires_at: None,
            user: Some(TokenUser { id: "user-1".to_string(), email: Some("o@example.com".to_string()) }),
        };
        let session = response.into_session().unwrap();
        assert_eq!(session.user_id, "user-1");
        assert_eq!(session.email.as_deref(), Some("o@example.com"));
        assert!(session.expires_at.unwrap() > Utc::now());
    }

    #[test]
    fn token_response_without_identity_is_rejected() {
        let response = TokenResponse {
            access_token: "opaque".to_string(),
            refresh_token: None,
            expires_in: None,
            expires_at: None,
            user: None,
        };
        assert!(response.into_session().is_err());
    }
}
