use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::SukiyakiError,
    lookup::RetryPolicy,
    persistence::{
        load_json_or_default,
        save_json,
    },
};

const SETTINGS_FILE: &str = "settings.json";

/// How hard to try against the remote lookup services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LookupSettings {
    pub retries: u32,
    pub delay_secs: u64,
    pub timeout_secs: u64,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self { retries: 2, delay_secs: 2, timeout_secs: 7 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub lookup: LookupSettings,
    pub dictionary_url: String,
    pub example_url: String,
    pub source_language: String,
    pub target_language: String,
    pub deck_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lookup: LookupSettings::default(),
            dictionary_url: "https://jisho.org/api/v1/search/words".to_string(),
            example_url: "https://tatoeba.org/en/api_v0/search".to_string(),
            source_language: "jpn".to_string(),
            target_language: "eng".to_string(),
            deck_name: "Sukiyaki Vocabulary".to_string(),
        }
    }
}

impl Settings {
    /// Loads from disk, falling back to defaults if the file is missing
    /// or unreadable. Fields absent from an older file keep their defaults.
    pub fn load() -> Self {
        load_json_or_default::<Settings>(SETTINGS_FILE)
    }

    pub fn save(&self) -> Result<(), SukiyakiError> {
        save_json(self, SETTINGS_FILE)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.lookup.retries,
            delay: Duration::from_secs(self.lookup.delay_secs),
            timeout: Duration::from_secs(self.lookup.timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_services_we_ship_against() {
        let settings = Settings::default();
        assert_eq!(settings.lookup.retries, 2);
        assert_eq!(settings.lookup.timeout_secs, 7);
        assert_eq!(settings.dictionary_url, "https://jisho.org/api/v1/search/words");
        assert_eq!(settings.example_url, "https://tatoeba.org/en/api_v0/search");
        assert_eq!(settings.source_language, "jpn");
        assert_eq!(settings.target_language, "eng");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"target_language": "deu"}"#).unwrap();
        assert_eq!(settings.target_language, "deu");
        assert_eq!(settings.source_language, "jpn");
        assert_eq!(settings.lookup, LookupSettings::default());
    }

    #[test]
    fn retry_policy_mirrors_lookup_settings() {
        let mut settings = Settings::default();
        settings.lookup.retries = 5;
        settings.lookup.delay_secs = 1;
        settings.lookup.timeout_secs = 30;

        let policy = settings.retry_policy();
        assert_eq!(policy.retries, 5);
        assert_eq!(policy.delay, Duration::from_secs(1));
        assert_eq!(policy.timeout, Duration::from_secs(30));
    }
}
