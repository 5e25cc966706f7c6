//! Q&A Graph Agent - command line
//!
//! Ask questions against the Stack Overflow for Teams graph, or call the
//! individual graph tools directly.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qa_graph_agent::chat::{ChatCompletionsPlanner, ChatManager};
use qa_graph_agent::mcp::all_tools;
use qa_graph_agent::neo4j::sort_by_created;
use qa_graph_agent::{AppState, Config};
use serde_json::{Map, Value};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "qa-agent")]
#[command(about = "Answer development questions from a Stack Overflow for Teams graph")]
#[command(version)]
struct Cli {
    /// Path to a YAML config file (default: ./config.yaml if present)
    #[arg(long, global = true, env = "QA_AGENT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tools available to the planner
    Tools,

    #[command(flatten)]
    Graph(GraphCommand),
}

/// Commands that need a Neo4j connection
#[derive(Subcommand)]
enum GraphCommand {
    /// Answer a single question
    Ask {
        /// The question, as you would ask a colleague
        question: Vec<String>,
    },

    /// Interactive question loop (empty line or `exit` to quit)
    Shell,

    /// Call one tool and print its JSON result
    Call {
        /// Tool name, e.g. get_thread
        tool: String,
        /// The tool's single argument
        argument: String,
    },

    /// Print a question's thread in chronological order
    Thread {
        /// Question id
        question_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries answers and JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,qa_graph_agent=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tools => print_tools(),
        Commands::Graph(command) => {
            let config = Config::from_yaml_and_env(cli.config.as_deref())?;
            let state = AppState::new(config).await?;
            tracing::info!("Connected to Neo4j");
            run(command, &state).await
        }
    }
}

async fn run(command: GraphCommand, state: &AppState) -> Result<()> {
    match command {
        GraphCommand::Ask { question } => {
            let manager = chat_manager(state)?;
            let answer = manager.answer(&question.join(" ")).await?;
            println!("{}", answer);
            Ok(())
        }
        GraphCommand::Shell => run_shell(state).await,
        GraphCommand::Call { tool, argument } => run_call(state, &tool, argument).await,
        GraphCommand::Thread { question_id } => {
            let mut posts = state.graph.get_thread(&question_id).await?;
            sort_by_created(&mut posts);
            println!("{}", serde_json::to_string_pretty(&posts)?);
            Ok(())
        }
    }
}

fn chat_manager(state: &AppState) -> Result<ChatManager> {
    let planner = ChatCompletionsPlanner::new(state.config.chat.clone())?;
    Ok(ChatManager::new(Arc::new(planner), state.tool_handler()))
}

fn print_tools() -> Result<()> {
    for tool in all_tools() {
        let param = tool
            .input_schema
            .required
            .as_ref()
            .and_then(|r| r.first().cloned())
            .unwrap_or_default();
        println!("{}({})\n    {}", tool.name, param, tool.description);
    }
    Ok(())
}

async fn run_call(state: &AppState, tool: &str, argument: String) -> Result<()> {
    let definition = all_tools()
        .into_iter()
        .find(|t| t.name == tool)
        .with_context(|| format!("Unknown tool: {} (see `qa-agent tools`)", tool))?;
    let param = definition
        .input_schema
        .required
        .and_then(|r| r.into_iter().next())
        .context("Tool declares no parameter")?;

    let mut args = Map::new();
    args.insert(param, Value::String(argument));

    let result = state
        .tool_handler()
        .handle(tool, Some(Value::Object(args)))
        .await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn run_shell(state: &AppState) -> Result<()> {
    let manager = chat_manager(state)?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() || question == "exit" {
            break;
        }

        match manager.answer(question).await {
            Ok(answer) => writeln!(stdout, "{}\n", answer)?,
            Err(e) => tracing::error!("Failed to answer: {:#}", e),
        }
    }

    Ok(())
}
