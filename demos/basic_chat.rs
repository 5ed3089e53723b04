//! Two turns in one session: the second question relies on the first.
//!
//! Run with: PARLEY_PROVIDER=openai OPENAI_API_KEY=... cargo run --example basic_chat

use parley::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("parley=info")
        .init();

    let config = Config::load_default()?.merge_env();
    let llm = create_provider(&config.llm, config.resolve_api_key()?)?;

    let agent = Agent::builder()
        .system_prompt("You are a helpful assistant.")
        .llm(llm)
        .tools_enabled(false)
        .build()?;

    let session = "demo";

    let reply = agent.respond(session, "What is the Rust programming language?").await?;
    println!("Assistant: {}\n", reply);

    let reply = agent.respond(session, "What are its main features?").await?;
    println!("Assistant: {}", reply);

    Ok(())
}
