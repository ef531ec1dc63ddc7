//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/babelcode/) and project (.babelcode/)
//! level configuration.

use serde::{Deserialize, Serialize};

use crate::ai::provider::ProviderConfig;
use crate::constants::network;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Ordered target-language list; this order is preserved through
    /// every artifact and the final report
    pub languages: Vec<String>,

    /// Translation backend settings
    pub translation: TranslationConfig,

    /// LLM provider settings
    pub llm: LlmConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            languages: default_languages(),
            translation: TranslationConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `BabelError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if self.languages.is_empty() {
            return Err(crate::types::BabelError::Config(
                "At least one target language is required".to_string(),
            ));
        }

        // Language codes key every mapping; duplicates would overwrite
        let mut seen = std::collections::HashSet::new();
        for lang in &self.languages {
            if !seen.insert(lang.as_str()) {
                return Err(crate::types::BabelError::Config(format!(
                    "Duplicate target language: {}",
                    lang
                )));
            }
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(crate::types::BabelError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(crate::types::BabelError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.translation.timeout_secs == 0 {
            return Err(crate::types::BabelError::Config(
                "Translation timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Provider configuration for the inference collaborator.
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            provider: self.llm.provider.clone(),
            model: self.llm.model.clone(),
            api_base: self.llm.api_base.clone(),
            timeout_secs: self.llm.timeout_secs,
            temperature: self.llm.temperature,
        }
    }
}

/// The twenty most-spoken languages, the default probe set.
fn default_languages() -> Vec<String> {
    [
        "en", "zh-CN", "hi", "es", "ar", "bn", "fr", "ru", "pt", "ur", "id", "de", "ja", "sw",
        "tr", "vi", "ko", "ta", "mr", "fa",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

// =============================================================================
// Translation Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// LibreTranslate-compatible endpoint
    pub endpoint: String,

    /// Source language of the base prompt
    pub source: String,

    /// API key, if the backend requires one.
    /// Never serialized to output for security.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000".to_string(),
            source: "en".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider type: "ollama"
    pub provider: String,

    /// Model name (provider-specific)
    pub model: Option<String>,

    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Temperature for generation (0.0 = deterministic)
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: None,
            api_base: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_default_language_order() {
        let config = Config::default();
        assert_eq!(config.languages.first().map(String::as_str), Some("en"));
        assert_eq!(config.languages.len(), 20);
    }

    #[test]
    fn test_duplicate_language_rejected() {
        let config = Config {
            languages: vec!["en".to_string(), "en".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_languages_rejected() {
        let config = Config {
            languages: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_temperature_bounds() {
        let mut config = Config::default();
        config.llm.temperature = 3.0;
        assert!(config.validate().is_err());
    }
}
