pub mod types;

pub use types::Settings;

use crate::error::{PublishError, Result};
use chrono::NaiveDate;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Basic-auth credentials shared by every Jira and Confluence call.
#[derive(Clone)]
pub struct AuthContext {
    user: String,
    secret: String,
}

impl AuthContext {
    pub fn new(user: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            secret: secret.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("user", &self.user)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Everything one run needs, built once in `main` and handed to each step.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub auth: AuthContext,
    pub jira_api: String,
    pub confluence_api: String,
    pub project_key: String,
    pub release_note_field: String,
    pub space_key: String,
    pub parent_page_id: String,
    pub release_version: String,
    pub release_date: NaiveDate,
    pub celebrate: bool,
    pub settings: Settings,
}

impl PublisherConfig {
    pub fn page_title(&self) -> String {
        format!("{}{}", self.settings.page_title_prefix, self.release_version)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.settings.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.settings.page_size == 0 {
            return Err(PublishError::Config("page_size must be at least 1".into()));
        }
        if self.settings.timeout_secs == 0 {
            return Err(PublishError::Config("timeout_secs must be at least 1".into()));
        }
        if self.release_version.trim().is_empty() {
            return Err(PublishError::Config(
                "a release version is required to publish".into(),
            ));
        }
        if self.project_key.trim().is_empty() {
            return Err(PublishError::Config("Jira project key is empty".into()));
        }
        Ok(())
    }
}

pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let content = std::fs::read_to_string(path)?;
    let settings = Settings::from_toml(&content)?;
    tracing::debug!(path = %path.display(), ?settings, "loaded settings");
    Ok(settings)
}

#[cfg(test)]
pub(crate) fn test_config(jira_api: &str, confluence_api: &str) -> PublisherConfig {
    PublisherConfig {
        auth: AuthContext::new("bot@example.com", "s3cr3t"),
        jira_api: jira_api.to_string(),
        confluence_api: confluence_api.to_string(),
        project_key: "ABC".to_string(),
        release_note_field: "customfield_10001".to_string(),
        space_key: "REL".to_string(),
        parent_page_id: "132221".to_string(),
        release_version: "2.0.0".to_string(),
        release_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        celebrate: false,
        settings: Settings::default(),
    }
}
