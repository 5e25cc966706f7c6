//! Chat Completions planner
//!
//! Drives an OpenAI-compatible `/chat/completions` endpoint with function
//! calling: the model requests tools, results go back as `tool` messages,
//! and the loop ends on the first plain-text reply or after `max_turns`.

use super::config::ChatConfig;
use super::planner::ToolPlanner;
use super::prompt::FALLBACK_ANSWER;
use crate::mcp::{ToolDefinition, ToolHandler};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl ChatMessage {
    fn text(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn tool_result(tool_call_id: &str, content: String) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    call_type: String,
    function: FunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    /// JSON-encoded arguments, as produced by the model
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    tools: &'a [Value],
    tool_choice: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Registry entry in the `tools` array format of the API
fn function_tool(tool: &ToolDefinition) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.input_schema,
        }
    })
}

// ============================================================================
// Planner
// ============================================================================

/// Tool-calling planner over any OpenAI-compatible chat API
#[derive(Clone)]
pub struct ChatCompletionsPlanner {
    client: reqwest::Client,
    config: ChatConfig,
}

impl ChatCompletionsPlanner {
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    async fn complete(&self, messages: &[ChatMessage], tools: &[Value]) -> Result<ChatMessage> {
        let url = self.config.completions_url();
        let body = ChatRequest {
            model: &self.config.model,
            messages,
            tools,
            tool_choice: "auto",
        };

        let mut req = self.client.post(&url).json(&body);
        if let Some(ref key) = self.config.api_key {
            req = req.bearer_auth(key);
        }

        let response = req
            .send()
            .await
            .with_context(|| format!("Failed to connect to chat API at {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Ok(ErrorResponse {
                error: Some(detail),
            }) = serde_json::from_str::<ErrorResponse>(&body)
            {
                anyhow::bail!("Chat API error ({}): {}", status.as_u16(), detail.message);
            }
            anyhow::bail!("Chat API returned {}: {}", status.as_u16(), body);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat API response")?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .context("Chat API returned no choices")
    }

    /// Run one requested tool; failures become text the model can read
    async fn run_tool(&self, call: &ToolCall, tools: &ToolHandler) -> String {
        let args: Value = if call.function.arguments.trim().is_empty() {
            json!({})
        } else {
            match serde_json::from_str(&call.function.arguments) {
                Ok(v) => v,
                Err(e) => return format!("Error: invalid arguments: {}", e),
            }
        };

        info!(tool = %call.function.name, "Planner called tool");
        match tools.handle(&call.function.name, Some(args)).await {
            Ok(value) => serde_json::to_string(&value).unwrap_or_default(),
            Err(e) => {
                warn!(tool = %call.function.name, "Tool error: {}", e);
                format!("Error: {}", e)
            }
        }
    }
}

#[async_trait]
impl ToolPlanner for ChatCompletionsPlanner {
    async fn answer(
        &self,
        system_prompt: &str,
        question: &str,
        tools: &ToolHandler,
    ) -> Result<String> {
        let functions: Vec<Value> = tools.definitions().iter().map(function_tool).collect();
        let mut messages = vec![
            ChatMessage::text("system", system_prompt),
            ChatMessage::text("user", question),
        ];

        for turn in 1..=self.config.max_turns {
            debug!("Chat turn {}/{}", turn, self.config.max_turns);
            let reply = self.complete(&messages, &functions).await?;

            let calls = reply.tool_calls.clone().unwrap_or_default();
            if calls.is_empty() {
                let text = reply.content.unwrap_or_default();
                let text = text.trim();
                return Ok(if text.is_empty() {
                    FALLBACK_ANSWER.to_string()
                } else {
                    text.to_string()
                });
            }

            messages.push(reply);
            for call in &calls {
                let content = self.run_tool(call, tools).await;
                messages.push(ChatMessage::tool_result(&call.id, content));
            }
        }

        warn!(
            "No final answer after {} turns, falling back",
            self.config.max_turns
        );
        Ok(FALLBACK_ANSWER.to_string())
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}
