//! Q&A Graph Agent
//!
//! Answers development questions from a Neo4j graph exported from
//! Stack Overflow for Teams:
//! - Neo4j read access (vector search, thread traversal, authorship)
//! - A registry of read-only tools for an LLM planner
//! - A tool-calling chat loop over any OpenAI-compatible API
//! - MCP server exposing the same tools to external clients

pub mod chat;
pub mod embeddings;
pub mod mcp;
pub mod neo4j;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::Result;
use chat::{ChatConfig, ChatYamlConfig};
use neo4j::{QuestionEncoder, SearchConfig};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub neo4j: Neo4jYamlConfig,
    pub search: SearchConfig,
    pub chat: ChatYamlConfig,
}

/// Neo4j configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".into(),
            user: "neo4j".into(),
            password: "neo4j".into(),
            database: neo4j::client::DEFAULT_DATABASE.into(),
        }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub neo4j_database: String,
    /// Credential for in-database question encoding and the chat API
    pub openai_api_key: Option<String>,
    pub search: SearchConfig,
    pub chat: ChatConfig,
}

impl Config {
    /// Load configuration from environment variables and `config.yaml` in CWD, if any.
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// `DB_URI`, `DB_USER`, `DB_PWD`, `DB_NAME`, `OPENAI_API_KEY`, plus the
    /// chat variables read by [`ChatConfig::from_yaml_and_env`].
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        Ok(Self {
            neo4j_uri: std::env::var("DB_URI").unwrap_or(yaml.neo4j.uri),
            neo4j_user: std::env::var("DB_USER").unwrap_or(yaml.neo4j.user),
            neo4j_password: std::env::var("DB_PWD").unwrap_or(yaml.neo4j.password),
            neo4j_database: std::env::var("DB_NAME")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(yaml.neo4j.database),
            chat: ChatConfig::from_yaml_and_env(&yaml.chat, openai_api_key.clone()),
            openai_api_key,
            search: yaml.search,
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }

    /// Pick the question encoder: a configured embedding endpoint, else the GenAI plugin
    pub fn question_encoder(&self) -> Result<QuestionEncoder> {
        if let Some(provider) = embeddings::HttpEmbeddingProvider::from_env()? {
            tracing::info!(
                "Encoding questions with {} ({} dims)",
                embeddings::EmbeddingProvider::model_name(&provider),
                embeddings::EmbeddingProvider::dimensions(&provider)
            );
            return Ok(QuestionEncoder::Provider(Arc::new(provider)));
        }

        if self.openai_api_key.is_none() {
            tracing::warn!(
                "OPENAI_API_KEY is not set: find_relevant_questions will fail until it is"
            );
        }
        Ok(QuestionEncoder::InDatabase {
            api_key: self.openai_api_key.clone(),
        })
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<dyn neo4j::GraphStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Connect to Neo4j with the configured question encoder
    pub async fn new(config: Config) -> Result<Self> {
        let encoder = config.question_encoder()?;
        let graph = Arc::new(
            neo4j::Neo4jClient::new(
                &config.neo4j_uri,
                &config.neo4j_user,
                &config.neo4j_password,
                &config.neo4j_database,
                config.search.clone(),
                encoder,
            )
            .await?,
        );

        Ok(Self {
            graph,
            config: Arc::new(config),
        })
    }

    /// Tool dispatcher over this state's graph
    pub fn tool_handler(&self) -> mcp::ToolHandler {
        mcp::ToolHandler::new(self.graph.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
