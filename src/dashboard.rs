//! Dashboard shell: gate the mount, load every tab at once, then hand out
//! the per-collection controllers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::controller::{
    Feedback, LoadState, Notice, ProjectsController, SettingsController, SkillsController,
    UploadFlag,
};
use crate::gateway::{Gateways, Session};
use crate::guard::{Authorization, SessionGuard};
use crate::types::Route;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Projects,
    Settings,
    Skills,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Projects, Tab::Settings, Tab::Skills];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Projects => "projects",
            Tab::Settings => "settings",
            Tab::Skills => "skills",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "projects" => Ok(Tab::Projects),
            "settings" => Ok(Tab::Settings),
            "skills" => Ok(Tab::Skills),
            other => Err(format!("unknown tab '{}'", other)),
        }
    }
}

/// What the caller should do after a mount
#[derive(Debug, Clone, PartialEq)]
pub enum Mount {
    Ready,
    Redirect(Route),
}

pub struct Dashboard {
    gateways: Gateways,
    guard: SessionGuard,
    feedback: Feedback,
    session: Option<Session>,
    active_tab: Tab,
    pub projects: ProjectsController,
    pub settings: SettingsController,
    pub skills: SkillsController,
    pub project_upload: UploadFlag,
    pub hero_upload: UploadFlag,
}

impl Dashboard {
    pub fn new(gateways: Gateways, feedback: Feedback, admin_role: impl Into<String>) -> Self {
        let guard = SessionGuard::new(gateways.auth.clone(), admin_role);
        Self {
            projects: ProjectsController::new(gateways.data.clone(), feedback.clone()),
            settings: SettingsController::new(gateways.data.clone(), feedback.clone()),
            skills: SkillsController::new(gateways.data.clone(), feedback.clone()),
            project_upload: UploadFlag::default(),
            hero_upload: UploadFlag::default(),
            gateways,
            guard,
            feedback,
            session: None,
            active_tab: Tab::default(),
        }
    }

    pub fn gateways(&self) -> &Gateways {
        &self.gateways
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// True while any tab is still fetching
    pub fn is_loading(&self) -> bool {
        [
            self.projects.load_state(),
            self.settings.load_state(),
            self.skills.load_state(),
        ]
        .contains(&LoadState::Loading)
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    /// Switch tabs; all data is already loaded, so nothing is fetched
    pub fn select_tab(&mut self, tab: Tab) {
        tracing::debug!("Switching to {} tab", tab);
        self.active_tab = tab;
    }

    /// Gate the mount and, once authorized, load all three collections concurrently.
    /// Denied mounts issue no collection loads.
    pub async fn mount(&mut self) -> Mount {
        match self.guard.authorize().await {
            Authorization::Unauthenticated => Mount::Redirect(Route::Login),
            Authorization::Forbidden => {
                self.feedback.notifier.notify(
                    Notice::error("You don't have admin privileges.").with_title("Access Denied"),
                );
                Mount::Redirect(Route::Home)
            }
            Authorization::Authorized(session) => {
                self.session = Some(session);
                self.load_all().await;
                Mount::Ready
            }
        }
    }

    /// Load every tab concurrently; failures are reported per controller
    async fn load_all(&mut self) {
        let (projects, settings, skills) = futures::join!(
            self.projects.load(),
            self.settings.load(),
            self.skills.load()
        );
        let failed = [projects.is_err(), settings.is_err(), skills.is_err()]
            .iter()
            .filter(|failed| **failed)
            .count();
        if failed > 0 {
            tracing::warn!("{} of 3 dashboard loads failed", failed);
        }
    }

    /// Invalidate the session and leave the dashboard
    pub async fn sign_out(&mut self) -> Route {
        if let Err(e) = self.gateways.auth.sign_out().await {
            tracing::error!("Sign-out failed: {}", e);
            self.feedback.error(e.to_string());
        }
        self.session = None;
        Route::Home
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tabs() {
        assert_eq!("Skills".parse::<Tab>().unwrap(), Tab::Skills);
        assert!("blog".parse::<Tab>().is_err());
        assert_eq!(Tab::default(), Tab::Projects);
    }
}
