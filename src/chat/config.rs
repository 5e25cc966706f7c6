//! Chat configuration

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Chat configuration section of `config.yaml`
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ChatYamlConfig {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_turns: Option<usize>,
}

/// Configuration for the tool-calling chat loop
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// OpenAI-compatible API root, without the `/chat/completions` suffix
    pub base_url: String,
    pub model: String,
    /// Bearer token; local servers may not need one
    pub api_key: Option<String>,
    /// Maximum number of model round-trips per question
    pub max_turns: usize,
}

impl ChatConfig {
    /// Resolve from env vars over the YAML section over defaults.
    ///
    /// `LLM_BASE_URL`, `LLM_MODEL`, `CHAT_MAX_TURNS`; the key is resolved by the caller.
    pub fn from_yaml_and_env(yaml: &ChatYamlConfig, api_key: Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("LLM_BASE_URL")
                .ok()
                .or_else(|| yaml.base_url.clone())
                .unwrap_or(defaults.base_url),
            model: std::env::var("LLM_MODEL")
                .ok()
                .or_else(|| yaml.model.clone())
                .unwrap_or(defaults.model),
            api_key,
            max_turns: std::env::var("CHAT_MAX_TURNS")
                .ok()
                .and_then(|s| s.parse().ok())
                .or(yaml.max_turns)
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_turns),
        }
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}
