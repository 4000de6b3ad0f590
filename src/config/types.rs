use serde::{Deserialize, Serialize};

/// Tunables that rarely change between runs. Loaded from an optional TOML
/// file; every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// fixVersion label Jira uses for work planned for the next release.
    pub pending_fix_version: String,
    pub done_status: String,
    pub page_size: u32,
    pub timeout_secs: u64,
    pub page_title_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            pending_fix_version: "Next-Release".to_string(),
            done_status: "Done".to_string(),
            page_size: 50,
            timeout_secs: 100,
            page_title_prefix: "Release - ".to_string(),
        }
    }
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let settings = Settings::from_toml(
            r#"
            pending_fix_version = "Upcoming"
            page_size = 100
            "#,
        )
        .unwrap();

        assert_eq!(settings.pending_fix_version, "Upcoming");
        assert_eq!(settings.page_size, 100);
        assert_eq!(settings.done_status, "Done");
        assert_eq!(settings.timeout_secs, 100);
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(Settings::from_toml("page_size = \"many\"").is_err());
    }
}
