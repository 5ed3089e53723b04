use colored::Colorize;

use super::Settings;

pub async fn run(settings: &Settings, system_prompt: Option<&str>, message: &str) -> anyhow::Result<()> {
    let agent = settings.create_agent(system_prompt)?;
    let session_id = uuid::Uuid::new_v4().to_string();

    match agent.respond(&session_id, message).await {
        Ok(response) => {
            println!("{}", response);
        }
        Err(e) => {
            eprintln!("{} {} ({})", "Error:".red().bold(), e, e.kind());
            std::process::exit(1);
        }
    }

    Ok(())
}
