//! Configuration types for the recognition engine.
//!
//! The recognition engine itself is a black box behind the
//! [`TextRecognizer`](crate::recognition::TextRecognizer) trait; these types
//! describe the small configuration surface a host passes when constructing
//! an engine, and the per-call options the adapter forwards with every
//! recognition request.

use serde::{Deserialize, Serialize};

use crate::core::{OcrError, OcrResult};

/// Configuration for constructing a recognition engine.
///
/// Model loading is the only latency-significant step in the pipeline, so a
/// host is expected to build one engine per process from this configuration
/// and keep it alive across invocations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Languages the engine should recognize.
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Whether to use hardware-accelerated recognition if available.
    #[serde(default)]
    pub use_gpu: bool,
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            use_gpu: false,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration for the given languages with acceleration off.
    pub fn new(languages: Vec<String>) -> Self {
        Self {
            languages,
            use_gpu: false,
        }
    }

    /// Enables or disables hardware-accelerated recognition.
    pub fn with_gpu(mut self, use_gpu: bool) -> Self {
        self.use_gpu = use_gpu;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an [`OcrError::ConfigError`] if the language list is empty.
    pub fn validate(&self) -> OcrResult<()> {
        if self.languages.is_empty() {
            return Err(OcrError::config_error(
                "engine configuration requires at least one language",
            ));
        }
        Ok(())
    }
}

/// Per-call options forwarded to the recognition engine.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecognizerOptions {
    /// Whether the engine may merge detected text lines into paragraphs.
    ///
    /// Off by default: the target identifier token is most likely to be
    /// isolated when each region stays a minimal detected unit.
    #[serde(default)]
    pub group_paragraphs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.languages, vec!["en".to_string()]);
        assert!(!config.use_gpu);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_languages_rejected() {
        let config = EngineConfig::new(vec![]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_gpu_toggle() {
        let config = EngineConfig::new(vec!["en".to_string()]).with_gpu(true);
        assert!(config.use_gpu);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_json_applies_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());

        let config: EngineConfig =
            serde_json::from_str(r#"{"languages": ["en", "de"], "use_gpu": true}"#).unwrap();
        assert_eq!(config.languages.len(), 2);
        assert!(config.use_gpu);
    }

    #[test]
    fn test_recognizer_options_default_disables_grouping() {
        assert!(!RecognizerOptions::default().group_paragraphs);
    }
}
