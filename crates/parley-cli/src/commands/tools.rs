use colored::Colorize;

use super::Settings;

pub fn run(settings: &Settings) -> anyhow::Result<()> {
    let registry = settings.create_registry()?;

    if registry.is_empty() {
        println!("{}", "No tools enabled.".dimmed());
        return Ok(());
    }

    for def in registry.list() {
        println!("{}  {}", def.name.cyan().bold(), def.description);
        let params = serde_json::to_string(&def.parameters)?;
        println!("    {}", params.dimmed());
    }

    Ok(())
}
