//! MCP Tool handlers
//!
//! Maps each tool name onto one `GraphStore` read and shapes the result as
//! JSON. Absent optional relations become the sentinel strings the planner
//! is told about in the tool descriptions.

use super::protocol::ToolDefinition;
use super::tools::all_tools;
use crate::neo4j::GraphStore;
use anyhow::Result;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Returned by `get_accepted_answer` when the question has none
pub const NO_ACCEPTED_ANSWER: &str = "No accepted answer";
/// Returned by `get_parent_post` for a top-level question
pub const NO_PARENT: &str = "No parent";

/// Errors raised at the tool boundary, before or after the graph is queried
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("{0} is required")]
    MissingArgument(&'static str),
    #[error("No author found for {0}")]
    NoAuthor(String),
}

/// Handles MCP tool calls
#[derive(Clone)]
pub struct ToolHandler {
    graph: Arc<dyn GraphStore>,
}

impl ToolHandler {
    pub fn new(graph: Arc<dyn GraphStore>) -> Self {
        Self { graph }
    }

    /// The registry this handler serves
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        all_tools()
    }

    /// Handle a tool call and return the result as JSON
    pub async fn handle(&self, name: &str, args: Option<Value>) -> Result<Value> {
        let args = args.unwrap_or(json!({}));
        debug!(tool = name, "Handling tool call");

        match name {
            // Search
            "find_relevant_questions" => self.find_relevant_questions(args).await,

            // Threads
            "get_thread" => self.get_thread(args).await,
            "get_accepted_answer" => self.get_accepted_answer(args).await,
            "get_comments" => self.get_comments(args).await,
            "get_parent_post" => self.get_parent_post(args).await,

            // Users
            "get_user" => self.get_user(args).await,
            "get_user_posts" => self.get_user_posts(args).await,
            "get_user_comments" => self.get_user_comments(args).await,

            _ => Err(ToolError::UnknownTool(name.to_string()).into()),
        }
    }

    // ========================================================================
    // Search
    // ========================================================================

    async fn find_relevant_questions(&self, args: Value) -> Result<Value> {
        let question = required_str(&args, "user_question")?;
        let posts = self.graph.find_relevant_questions(question).await?;
        Ok(serde_json::to_value(posts)?)
    }

    // ========================================================================
    // Threads
    // ========================================================================

    async fn get_thread(&self, args: Value) -> Result<Value> {
        let question_id = required_str(&args, "question_id")?;
        let posts = self.graph.get_thread(question_id).await?;
        Ok(serde_json::to_value(posts)?)
    }

    async fn get_accepted_answer(&self, args: Value) -> Result<Value> {
        let question_id = required_str(&args, "question_id")?;
        match self.graph.get_accepted_answer(question_id).await? {
            Some(post) => Ok(serde_json::to_value(post)?),
            None => Ok(json!(NO_ACCEPTED_ANSWER)),
        }
    }

    async fn get_comments(&self, args: Value) -> Result<Value> {
        let post_id = required_str(&args, "post_id")?;
        let comments = self.graph.get_comments(post_id).await?;
        Ok(serde_json::to_value(comments)?)
    }

    async fn get_parent_post(&self, args: Value) -> Result<Value> {
        let entity_id = required_str(&args, "entity_id")?;
        match self.graph.get_parent_post(entity_id).await? {
            Some(post) => Ok(serde_json::to_value(post)?),
            None => Ok(json!(NO_PARENT)),
        }
    }

    // ========================================================================
    // Users
    // ========================================================================

    async fn get_user(&self, args: Value) -> Result<Value> {
        let entity_id = required_str(&args, "entity_id")?;
        let user = self
            .graph
            .get_user(entity_id)
            .await?
            .ok_or_else(|| ToolError::NoAuthor(entity_id.to_string()))?;
        Ok(serde_json::to_value(user)?)
    }

    async fn get_user_posts(&self, args: Value) -> Result<Value> {
        let user_id = required_str(&args, "user_id")?;
        let posts = self.graph.get_user_posts(user_id).await?;
        Ok(serde_json::to_value(posts)?)
    }

    async fn get_user_comments(&self, args: Value) -> Result<Value> {
        let user_id = required_str(&args, "user_id")?;
        let comments = self.graph.get_user_comments(user_id).await?;
        Ok(serde_json::to_value(comments)?)
    }
}

/// Non-blank string argument, trimmed
fn required_str<'a>(args: &'a Value, field: &'static str) -> Result<&'a str, ToolError> {
    args.get(field)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ToolError::MissingArgument(field))
}
