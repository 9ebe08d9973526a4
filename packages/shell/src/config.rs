//! # Shell configuration — `allwayscare.toml`
//!
//! Optional TOML file read at startup by the host application
//! (filename: [`ShellConfig::filename`] = `"allwayscare.toml"`).
//!
//! ## Structure
//!
//! ```toml
//! [storage]
//! family_members_key = "allwayscare-family-members"
//!
//! [speech]
//! language_code = "en-US"      # BCP 47 tag passed to the speech engine
//! announce_navigation = true   # say "Opening <screen>" on view changes
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`ShellConfig`] | Top-level config with builder helpers and TOML (de)serialisation. |
//! | [`StorageConfig`] | Durable storage key for the family member list. |
//! | [`SpeechConfig`] | Announcement language and on/off switch. |
//!
//! Every field has a default, so a missing or empty file is the default
//! configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid shell config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not serialise shell config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level configuration stored in `allwayscare.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShellConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

/// Durable storage settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_family_members_key")]
    pub family_members_key: String,
}

fn default_family_members_key() -> String {
    profiles::FAMILY_MEMBERS_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            family_members_key: default_family_members_key(),
        }
    }
}

/// Navigation announcement settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_language_code")]
    pub language_code: String,
    #[serde(default = "default_announce_navigation")]
    pub announce_navigation: bool,
}

fn default_language_code() -> String {
    "en-US".to_string()
}

fn default_announce_navigation() -> bool {
    true
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language_code: default_language_code(),
            announce_navigation: default_announce_navigation(),
        }
    }
}

impl ShellConfig {
    /// Builder method to set the speech language.
    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.speech.language_code = code.into();
        self
    }

    /// Builder method to switch navigation announcements on or off.
    pub fn with_announcements(mut self, enabled: bool) -> Self {
        self.speech.announce_navigation = enabled;
        self
    }

    /// Builder method to override the storage key.
    pub fn with_family_members_key(mut self, key: impl Into<String>) -> Self {
        self.storage.family_members_key = key.into();
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "allwayscare.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = ShellConfig::from_toml("").unwrap();
        assert_eq!(config, ShellConfig::default());
        assert_eq!(config.storage.family_members_key, "allwayscare-family-members");
        assert_eq!(config.speech.language_code, "en-US");
        assert!(config.speech.announce_navigation);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = ShellConfig::from_toml("[speech]\nlanguage_code = \"hi-IN\"\n").unwrap();
        assert_eq!(config.speech.language_code, "hi-IN");
        assert!(config.speech.announce_navigation);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_roundtrip() {
        let config = ShellConfig::default()
            .with_language("ta-IN")
            .with_announcements(false)
            .with_family_members_key("family-v2");
        let text = config.to_toml().unwrap();
        assert_eq!(ShellConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            ShellConfig::from_toml("[speech\nlanguage_code = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
