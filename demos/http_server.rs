//! Serves the responder over HTTP with the built-in tools.
//!
//! Run with: cargo run --example http_server
//!
//! Then:
//!   curl -X POST http://127.0.0.1:3000/api/v1/chat \
//!     -H 'Content-Type: application/json' \
//!     -d '{"session_id": "demo", "message": "Convert 5 km to miles"}'

use parley::prelude::*;
use parley::server::shutdown_signal;
use parley::tools::create_default_registry;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("parley=info,tower_http=debug")
        .init();

    let config = Config::load_default()?.merge_env();
    let llm = create_provider(&config.llm, config.resolve_api_key()?)?;

    let agent = Agent::builder()
        .system_prompt("You are a helpful assistant with access to tools.")
        .llm(llm)
        .tool_registry(Arc::new(create_default_registry()?))
        .build()?;

    let server_config = ServerConfig::from(&config.server);
    println!(
        "Listening on http://{}:{}",
        server_config.host, server_config.port
    );

    Server::new(server_config, agent)
        .run_with_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
