//! MCP Tool definitions
//!
//! Defines the 8 read-only tools the planner can call against the Q&A graph.
//! Every tool takes exactly one required string parameter.

use super::protocol::{InputSchema, ToolDefinition};
use serde_json::{json, Map, Value};

/// Generate all tool definitions
pub fn all_tools() -> Vec<ToolDefinition> {
    let mut tools = Vec::new();
    tools.extend(search_tools());
    tools.extend(thread_tools());
    tools.extend(user_tools());
    tools
}

/// Build a definition for a tool with a single required string parameter
fn single_arg_tool(name: &str, description: &str, param: &str, param_doc: &str) -> ToolDefinition {
    let mut properties = Map::new();
    properties.insert(
        param.to_string(),
        json!({"type": "string", "description": param_doc}),
    );
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: InputSchema {
            schema_type: "object".to_string(),
            properties: Some(Value::Object(properties)),
            required: Some(vec![param.to_string()]),
        },
    }
}

// ============================================================================
// Search Tools (1)
// ============================================================================

fn search_tools() -> Vec<ToolDefinition> {
    vec![single_arg_tool(
        "find_relevant_questions",
        "Find relevant questions (topics) using vector search on the user's question. \
         Returns candidate questions to use as starting points for traversal.",
        "user_question",
        "The question exactly as asked by the user",
    )]
}

// ============================================================================
// Thread Tools (4)
// ============================================================================

fn thread_tools() -> Vec<ToolDefinition> {
    vec![
        single_arg_tool(
            "get_thread",
            "For a question/topic, return all posts in that thread (question + answers), \
             unsorted; each has a 'created' field.",
            "question_id",
            "Id of the question whose thread to return",
        ),
        single_arg_tool(
            "get_accepted_answer",
            "For a question/topic, return the accepted answer if present; \
             otherwise the string 'No accepted answer'.",
            "question_id",
            "Id of the question",
        ),
        single_arg_tool(
            "get_comments",
            "Fetch all comments for a specific post (question or answer). May be empty.",
            "post_id",
            "Id of the question or answer",
        ),
        single_arg_tool(
            "get_parent_post",
            "Get the parent post for an answer or comment, \
             or 'No parent' if it is a top-level question.",
            "entity_id",
            "Id of an answer or comment",
        ),
    ]
}

// ============================================================================
// User Tools (3)
// ============================================================================

fn user_tools() -> Vec<ToolDefinition> {
    vec![
        single_arg_tool(
            "get_user",
            "Get the user who posted a question, answer, or comment.",
            "entity_id",
            "Id of a post or comment",
        ),
        single_arg_tool(
            "get_user_posts",
            "List all posts (questions and answers) written by the given user.",
            "user_id",
            "Id of the user",
        ),
        single_arg_tool(
            "get_user_comments",
            "List all comments written by the given user.",
            "user_id",
            "Id of the user",
        ),
    ]
}
