//! Streamed run events demo.
//!
//! An agent first calls a tool to decide how many jokes to tell, then tells
//! them; the run is consumed as a stream of events rather than a final
//! result.

use std::sync::Arc;

use rand::Rng;
use tracing_subscriber::EnvFilter;

use triage_agents::{
    Agent, FunctionTool, ProviderSettings, Result, RunConfig, RunEvent, Runner,
};

fn how_many_jokes_tool() -> Arc<FunctionTool> {
    Arc::new(FunctionTool::new(
        "how_many_jokes",
        "Decide how many jokes to tell.",
        serde_json::json!({"type": "object", "properties": {}}),
        |_args| {
            let count: u32 = rand::thread_rng().gen_range(1..=5);
            Ok(serde_json::json!(count))
        },
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let provider = ProviderSettings::from_env()?.provider();

    let agent = Agent::simple(
        "Joker",
        "First call the `how_many_jokes` tool, then tell that many jokes.",
    )
    .with_tool(how_many_jokes_tool());

    let config = RunConfig::default().with_model_provider(provider);
    let mut stream = Runner::run_stream(agent, "Hello", config);

    println!("=== Run starting ===");
    while let Some(event) = stream.next_event().await {
        match event {
            RunEvent::AgentUpdated { name } => println!("Agent updated: {name}"),
            RunEvent::ToolCalled { tool_name, .. } => {
                println!("-- Tool was called: {tool_name}")
            }
            RunEvent::ToolOutput { output, .. } => println!("-- Tool output: {output}"),
            RunEvent::MessageOutput { content, .. } => {
                println!("-- Message output:\n {content}")
            }
            RunEvent::Handoff {
                from_agent,
                to_agent,
            } => println!("-- Handoff: {from_agent} -> {to_agent}"),
            RunEvent::RunCompleted { result } => {
                println!("=== Run complete ({}) ===", result.usage.summary());
            }
            RunEvent::RunFailed { error } => println!("=== Run failed: {error} ==="),
        }
    }

    Ok(())
}
