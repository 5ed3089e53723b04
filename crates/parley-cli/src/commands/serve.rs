use colored::Colorize;
use parley_server::{shutdown_signal, Server, ServerConfig};

use super::Settings;

pub async fn run(
    settings: &Settings,
    system_prompt: Option<&str>,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let agent = settings.create_agent(system_prompt)?;

    let mut config = ServerConfig::from(&settings.config.server);
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }

    println!("{}", "Starting parley server...".green().bold());
    println!(
        "Listening on {}:{}",
        config.host.cyan(),
        config.port.to_string().cyan()
    );
    println!("Press {} to stop\n", "Ctrl+C".yellow());

    let server = Server::new(config, agent);
    server
        .run_with_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    println!("\n{}", "Server stopped.".green());
    Ok(())
}
