//! MCP Server Binary
//!
//! Serves the Q&A graph tools over stdio so any MCP client can plan with them.
//!
//! # Usage
//!
//! ```bash
//! DB_URI=neo4j+s://xxxx.databases.neo4j.io DB_USER=neo4j DB_PWD=secret \
//! OPENAI_API_KEY=sk-... ./mcp_server
//!
//! # With debug logging
//! RUST_LOG=debug ./mcp_server
//! ```
//!
//! # Client configuration
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "qa-graph-agent": {
//!       "command": "/path/to/mcp_server",
//!       "env": {
//!         "DB_URI": "neo4j+s://xxxx.databases.neo4j.io",
//!         "DB_USER": "neo4j",
//!         "DB_PWD": "your-password",
//!         "OPENAI_API_KEY": "sk-..."
//!       }
//!     }
//!   }
//! }
//! ```

use anyhow::Result;
use clap::Parser;
use qa_graph_agent::mcp::McpServer;
use qa_graph_agent::{AppState, Config};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// MCP server for the Q&A graph
#[derive(Parser, Debug)]
#[command(name = "mcp_server")]
#[command(about = "MCP server exposing the Stack Overflow for Teams graph tools")]
#[command(version)]
struct Args {
    /// Path to a YAML config file (default: ./config.yaml if present)
    #[arg(long, env = "QA_AGENT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Initialize logging (to stderr to keep stdout clean for MCP)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("qa_graph_agent=info".parse()?))
        .init();

    let args = Args::parse();
    let config = Config::from_yaml_and_env(args.config.as_deref())?;

    info!("Starting MCP server for qa-graph-agent");
    info!("Neo4j: {} (database {})", config.neo4j_uri, config.neo4j_database);

    let state = match AppState::new(config).await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to create app state: {}", e);
            return Err(e);
        }
    };

    let mut server = McpServer::new(state.tool_handler());

    if let Err(e) = server.run().await {
        error!("MCP server error: {}", e);
        return Err(e);
    }

    Ok(())
}
