//! A single custom tool: the model must call `add_fee` to answer.
//!
//! Run with: cargo run --example add_fee

use parley::prelude::*;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
struct AddFeeArgs {
    amount: f64,
}

fn add_fee_tool() -> FunctionTool {
    let def = ToolDefinition::new("add_fee", "Adds the 30% processing fee to an amount")
        .with_required_param(
            "amount",
            ToolParameter::number().with_description("Amount before the fee"),
        );

    FunctionTool::typed(def, |args: AddFeeArgs| Ok(format!("{}", args.amount * 1.3)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("parley=debug")
        .init();

    let config = Config::load_default()?.merge_env();
    let llm = create_provider(&config.llm, config.resolve_api_key()?)?;

    let registry = ToolRegistry::builder().tool(add_fee_tool())?.build();

    let agent = Agent::builder()
        .system_prompt("Use the add_fee tool whenever a price needs its fee applied.")
        .llm(llm)
        .tool_registry(Arc::new(registry))
        .build()?;

    let response = agent
        .process("billing", "What is the total for a 100 credit order?")
        .await?;

    for call in &response.tool_calls {
        println!("{}({}) -> {}", call.name, call.input, call.output);
    }
    println!("\nAssistant: {}", response.text);
    println!(
        "({} rounds, {} tokens)",
        response.iterations,
        response.usage.total()
    );

    Ok(())
}
