//! Analyzer configuration.
//!
//! All knobs are explicit constructor inputs; nothing is read from ambient
//! globals at call time. [`AnalyzerConfig::from_env`] is a convenience loader
//! for the key material (`.env` + environment).

use crate::extract::ExtractOptions;

/// Configuration for [`DocumentAnalyzer`](crate::DocumentAnalyzer).
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// API key for the completion endpoint.
    pub api_key: String,

    /// Base URL of the completion endpoint.
    pub base_url: String,

    /// Model identifier.
    pub model: String,

    /// Maximum output tokens per completion.
    pub max_tokens: u32,

    /// Extraction sampling and budget knobs.
    pub extract: ExtractOptions,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-sonnet-4-5".to_string(),
            max_tokens: 4096,
            extract: ExtractOptions::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Load overrides from `.env` and the environment.
    ///
    /// Reads `ANTHROPIC_API_KEY`, `ANTHROPIC_BASE_URL`, and `ANALYZER_MODEL`;
    /// anything unset keeps its default.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            config.api_key = key;
        }
        if let Ok(url) = std::env::var("ANTHROPIC_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(model) = std::env::var("ANALYZER_MODEL") {
            config.model = model;
        }
        config
    }
}
