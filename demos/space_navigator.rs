//! HAL-9001, a sarcastic but efficient intergalactic navigation assistant.
//!
//! Defaults to Gemini; set PARLEY_PROVIDER to use another backend.
//!
//! Run with: GEMINI_API_KEY=... cargo run --example space_navigator

use parley::prelude::*;
use parley::tools::WebSearchTool;
use serde::Deserialize;
use std::sync::Arc;

const PERSONA: &str = "You are HAL-9001, an intergalactic navigation assistant. \
You are sarcastic but efficient. Use your tools for fuel estimates and gravity \
checks instead of guessing, and search the web for anything outside your charts.";

#[derive(Deserialize)]
struct FuelArgs {
    light_years: f64,
}

#[derive(Deserialize)]
struct GravityArgs {
    planet_name: String,
}

fn antimatter_fuel(light_years: f64) -> f64 {
    light_years * 1.5 + 10.0
}

fn gravity_of(planet: &str) -> &'static str {
    match planet.trim().to_lowercase().as_str() {
        "mars" | "marte" => "0.38g (safe)",
        "jupiter" => "2.48g (danger: crushing)",
        "proxima b" => "1.1g (ideal)",
        _ => "Data not available in the galactic database.",
    }
}

fn navigation_tools() -> anyhow::Result<ToolRegistry> {
    let fuel = FunctionTool::typed(
        ToolDefinition::new(
            "calculate_antimatter_fuel",
            "Estimates the antimatter fuel, in units, needed for a jump",
        )
        .with_required_param(
            "light_years",
            ToolParameter::number().with_description("Jump distance in light years"),
        ),
        |args: FuelArgs| {
            Ok(format!(
                "{:.2} units of antimatter required",
                antimatter_fuel(args.light_years)
            ))
        },
    );

    let gravity = FunctionTool::typed(
        ToolDefinition::new(
            "planet_gravity_alert",
            "Reports surface gravity and landing safety for a planet",
        )
        .with_required_param(
            "planet_name",
            ToolParameter::string().with_description("Name of the planet"),
        ),
        |args: GravityArgs| {
            Ok(format!(
                "Gravity report for {}: {}",
                args.planet_name,
                gravity_of(&args.planet_name)
            ))
        },
    );

    let registry = ToolRegistry::builder()
        .tool(fuel)?
        .tool(gravity)?
        .tool(WebSearchTool::new())?
        .build();
    Ok(registry)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("parley=info")
        .init();

    let mut config = Config::load_default()?;
    config.llm.provider = ProviderKind::Gemini;
    let config = config.merge_env();
    let llm = create_provider(&config.llm, config.resolve_api_key()?)?;

    let agent = Agent::builder()
        .name("HAL-9001")
        .system_prompt(PERSONA)
        .llm(llm)
        .tool_registry(Arc::new(navigation_tools()?))
        .build()?;

    let session = "pilot_1";
    let questions = [
        "We need to jump 20 light years. How much fuel do we need?",
        "Is it safe to land on Jupiter?",
        "And what about the planet I asked about before?",
    ];

    for question in questions {
        println!("Pilot: {}", question);
        let reply = agent.respond(session, question).await?;
        println!("HAL-9001: {}\n", reply);
    }

    Ok(())
}
