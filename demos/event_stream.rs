//! Prints each event of a turn as it happens.
//!
//! Run with: cargo run --example event_stream

use futures::StreamExt;
use parley::prelude::*;
use parley::tools::create_default_registry;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("parley=warn")
        .init();

    let config = Config::load_default()?.merge_env();
    let llm = create_provider(&config.llm, config.resolve_api_key()?)?;

    let agent = Agent::builder()
        .system_prompt("You are a helpful assistant. Use tools when they help.")
        .llm(llm)
        .tool_registry(Arc::new(create_default_registry()?))
        .build()?;

    let mut events = std::pin::pin!(agent.respond_stream(
        "stream-demo",
        "How many feet are in 3 kilometers?"
    ));

    while let Some(event) = events.next().await {
        match &event {
            AgentEvent::ToolUseStart { name, input, .. } => {
                println!("[{}] {}({})", event.name(), name, input);
            }
            AgentEvent::ToolUseEnd { output, is_error, .. } => {
                println!("[{}] error={} {}", event.name(), is_error, output);
            }
            AgentEvent::TextComplete { text } => println!("[{}] {}", event.name(), text),
            other => println!("[{}] {}", other.name(), serde_json::to_string(other)?),
        }
    }

    Ok(())
}
