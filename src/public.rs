//! Read-only views of the managed data, as the public pages see it.
//! They tolerate a missing settings row by falling back to fixed defaults.

use serde::Serialize;

use crate::error::{AdminError, AdminResult};
use crate::gateway::{DataGateway, RecordQuery};
use crate::models::{Entity, Project, SiteSettings};
use crate::types::Collection;

pub const DEFAULT_HERO_TITLE: &str = "Hi, welcome to my portfolio";
pub const DEFAULT_HERO_SUBTITLE: &str = "Full Stack Developer & Creative Problem Solver";
pub const DEFAULT_GITHUB_URL: &str = "https://github.com";
pub const DEFAULT_LINKEDIN_URL: &str = "https://linkedin.com";
pub const DEFAULT_TWITTER_URL: &str = "https://twitter.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLink {
    pub label: &'static str,
    pub url: String,
}

/// Location, availability and email, shown only when at least one is set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactLine {
    pub location: Option<String>,
    pub availability: Option<String>,
    pub email: Option<String>,
}

/// The home page hero as resolved from settings plus defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeProfile {
    pub hero_title: String,
    pub hero_subtitle: String,
    pub hero_image_url: Option<String>,
    pub bio: Option<String>,
    pub contact: Option<ContactLine>,
    pub social_links: Vec<SocialLink>,
}

fn present(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

impl HomeProfile {
    pub fn resolve(settings: Option<&SiteSettings>) -> Self {
        let field = |pick: fn(&SiteSettings) -> Option<&String>| present(settings.and_then(pick));

        let contact = ContactLine {
            location: field(|s| s.location.as_ref()),
            availability: field(|s| s.availability.as_ref()),
            email: field(|s| s.email.as_ref()),
        };
        let has_contact =
            contact.location.is_some() || contact.availability.is_some() || contact.email.is_some();

        let social_links = vec![
            SocialLink {
                label: "GitHub",
                url: field(|s| s.github_url.as_ref()).unwrap_or_else(|| DEFAULT_GITHUB_URL.to_string()),
            },
            SocialLink {
                label: "LinkedIn",
                url: field(|s| s.linkedin_url.as_ref()).unwrap_or_else(|| DEFAULT_LINKEDIN_URL.to_string()),
            },
            SocialLink {
                label: "Twitter",
                url: field(|s| s.twitter_url.as_ref()).unwrap_or_else(|| DEFAULT_TWITTER_URL.to_string()),
            },
        ];

        Self {
            hero_title: field(|s| s.hero_title.as_ref()).unwrap_or_else(|| DEFAULT_HERO_TITLE.to_string()),
            hero_subtitle: field(|s| s.hero_subtitle.as_ref())
                .unwrap_or_else(|| DEFAULT_HERO_SUBTITLE.to_string()),
            hero_image_url: field(|s| s.hero_image_url.as_ref()),
            bio: field(|s| s.bio.as_ref()),
            contact: has_contact.then_some(contact),
            social_links,
        }
    }
}

/// Fetch the settings row for the home page. A failed fetch degrades to defaults.
pub async fn home_profile(data: &dyn DataGateway) -> HomeProfile {
    let settings = match data.get_singleton(Collection::SiteSettings).await {
        Ok(row) => row.and_then(|row| match SiteSettings::from_record(&row) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!("Ignoring malformed site settings: {}", e);
                None
            }
        }),
        Err(e) => {
            tracing::error!("Error fetching site settings: {}", e);
            None
        }
    };
    HomeProfile::resolve(settings.as_ref())
}

/// Projects in display order, optionally only the featured ones
pub async fn public_projects(data: &dyn DataGateway, featured_only: bool) -> AdminResult<Vec<Project>> {
    let mut query = RecordQuery::ordered(Project::order());
    if featured_only {
        query = query.eq("featured", "true");
    }
    let rows = data.list(Collection::Projects, &query).await?;
    rows.iter()
        .map(|row| Project::from_record(row).map_err(|e| AdminError::malformed(Collection::Projects, e)))
        .collect()
}
