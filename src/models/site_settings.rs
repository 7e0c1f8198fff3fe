use serde::{Deserialize, Serialize};

use super::form::{blank_to_none, none_to_blank};
use super::{Record, RecordError};
use crate::types::RecordId;

/// The singleton row configuring the public pages. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub id: Option<RecordId>,
    pub hero_image_url: Option<String>,
    pub hero_title: Option<String>,
    pub hero_subtitle: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub availability: Option<String>,
    pub email: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSettingsForm {
    pub hero_image_url: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub bio: String,
    pub location: String,
    pub availability: String,
    pub email: String,
    pub github_url: String,
    pub linkedin_url: String,
    pub twitter_url: String,
}

/// Write body; empty form fields become null
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteSettingsPayload {
    pub hero_image_url: Option<String>,
    pub hero_title: Option<String>,
    pub hero_subtitle: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub availability: Option<String>,
    pub email: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
}

impl SiteSettings {
    pub fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            id: Some(record.id()?),
            hero_image_url: record.opt_str("hero_image_url")?,
            hero_title: record.opt_str("hero_title")?,
            hero_subtitle: record.opt_str("hero_subtitle")?,
            bio: record.opt_str("bio")?,
            location: record.opt_str("location")?,
            availability: record.opt_str("availability")?,
            email: record.opt_str("email")?,
            github_url: record.opt_str("github_url")?,
            linkedin_url: record.opt_str("linkedin_url")?,
            twitter_url: record.opt_str("twitter_url")?,
        })
    }

    pub fn to_form(&self) -> SiteSettingsForm {
        SiteSettingsForm {
            hero_image_url: none_to_blank(self.hero_image_url.as_ref()),
            hero_title: none_to_blank(self.hero_title.as_ref()),
            hero_subtitle: none_to_blank(self.hero_subtitle.as_ref()),
            bio: none_to_blank(self.bio.as_ref()),
            location: none_to_blank(self.location.as_ref()),
            availability: none_to_blank(self.availability.as_ref()),
            email: none_to_blank(self.email.as_ref()),
            github_url: none_to_blank(self.github_url.as_ref()),
            linkedin_url: none_to_blank(self.linkedin_url.as_ref()),
            twitter_url: none_to_blank(self.twitter_url.as_ref()),
        }
    }
}

impl SiteSettingsForm {
    pub fn payload(&self) -> SiteSettingsPayload {
        SiteSettingsPayload {
            hero_image_url: blank_to_none(&self.hero_image_url),
            hero_title: blank_to_none(&self.hero_title),
            hero_subtitle: blank_to_none(&self.hero_subtitle),
            bio: blank_to_none(&self.bio),
            location: blank_to_none(&self.location),
            availability: blank_to_none(&self.availability),
            email: blank_to_none(&self.email),
            github_url: blank_to_none(&self.github_url),
            linkedin_url: blank_to_none(&self.linkedin_url),
            twitter_url: blank_to_none(&self.twitter_url),
        }
    }
}
