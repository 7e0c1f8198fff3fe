use std::sync::Arc;

use crate::error::{AdminError, AdminResult};
use crate::gateway::{AuthGateway, Session};

/// Result of gating one dashboard mount
#[derive(Debug, Clone, PartialEq)]
pub enum Authorization {
    Authorized(Session),
    /// No session; send the caller to sign in
    Unauthenticated,
    /// Signed in without the admin role
    Forbidden,
}

impl Authorization {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Authorization::Authorized(_))
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Authorization::Authorized(_) => "authorized",
            Authorization::Unauthenticated => "unauthenticated",
            Authorization::Forbidden => "forbidden",
        }
    }

    pub fn into_result(self) -> AdminResult<Session> {
        match self {
            Authorization::Authorized(session) => Ok(session),
            Authorization::Unauthenticated => Err(AdminError::AuthenticationRequired),
            Authorization::Forbidden => Err(AdminError::authorization_denied(
                "You don't have admin privileges.",
            )),
        }
    }
}

/// Checks for a session and the configured admin role.
/// Evaluated once per mount; a revoked role takes effect on the next mount.
#[derive(Clone)]
pub struct SessionGuard {
    auth: Arc<dyn AuthGateway>,
    role: String,
}

impl SessionGuard {
    pub fn new(auth: Arc<dyn AuthGateway>, role: impl Into<String>) -> Self {
        Self {
            auth,
            role: role.into(),
        }
    }

    pub async fn authorize(&self) -> Authorization {
        let session = match self.auth.get_session().await {
            Ok(Some(session)) => session,
            Ok(None) => {
                tracing::info!("No active session");
                return Authorization::Unauthenticated;
            }
            Err(e) => {
                tracing::warn!("Session lookup failed: {}", e);
                return Authorization::Unauthenticated;
            }
        };

        match self.auth.has_role(&session.user_id, &self.role).await {
            Ok(true) => {
                tracing::info!("User {} authorized as {}", session.user_id, self.role);
                Authorization::Authorized(session)
            }
            Ok(false) => {
                tracing::warn!("User {} lacks role {}", session.user_id, self.role);
                Authorization::Forbidden
            }
            Err(e) => {
                tracing::warn!("Role lookup for {} failed: {}", session.user_id, e);
                Authorization::Forbidden
            }
        }
    }
}
