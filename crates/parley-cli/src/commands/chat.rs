use colored::Colorize;
use parley_agent::{Agent, AgentEvent, SessionStore, Speaker};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio_stream::StreamExt;

use super::Settings;

pub async fn run(settings: &Settings, system_prompt: Option<&str>, session: Option<String>) -> anyhow::Result<()> {
    let agent = settings.create_agent(system_prompt)?;
    let session_id = session.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    println!("{}", "parley".green().bold());
    println!(
        "Session {}. Type {} to reset it, {} to show it, {} to exit\n",
        session_id.dimmed(),
        "/clear".yellow(),
        "/history".yellow(),
        "quit".yellow()
    );

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline(&format!("{} ", "You:".cyan().bold()));

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "quit" || line == "exit" {
                    println!("{}", "Goodbye!".green());
                    break;
                }

                rl.add_history_entry(line)?;

                match line {
                    "/clear" => {
                        agent.sessions().clear(&session_id).await?;
                        println!("{}\n", "History cleared.".dimmed());
                    }
                    "/history" => print_history(&agent, &session_id).await?,
                    _ => respond(&agent, &session_id, line).await,
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".yellow());
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".green());
                break;
            }
            Err(err) => {
                println!("{} {:?}", "Error:".red().bold(), err);
                break;
            }
        }
    }

    Ok(())
}

async fn respond(agent: &Agent, session_id: &str, line: &str) {
    let mut events = std::pin::pin!(agent.respond_stream(session_id, line));

    while let Some(event) = events.next().await {
        match event {
            AgentEvent::ToolUseStart { name, input, .. } => {
                println!("{}", format!("  -> {}({})", name, input).dimmed());
            }
            AgentEvent::ToolUseEnd { is_error: true, output, .. } => {
                println!("{}", format!("  <- {}", output).yellow());
            }
            AgentEvent::TextComplete { text } => {
                println!("{} {}\n", "Assistant:".magenta().bold(), text);
            }
            AgentEvent::Error { message, .. } => {
                println!("{} {}\n", "Error:".red().bold(), message);
            }
            _ => {}
        }
    }
}

async fn print_history(agent: &Agent, session_id: &str) -> anyhow::Result<()> {
    let Some(transcript) = agent.sessions().get(session_id).await? else {
        println!("{}\n", "(empty)".dimmed());
        return Ok(());
    };

    let turns = transcript.turns();
    if turns.is_empty() {
        println!("{}\n", "(empty)".dimmed());
    }
    for turn in turns {
        let label = match turn.speaker {
            Speaker::User => "You:".cyan().bold(),
            Speaker::Assistant => "Assistant:".magenta().bold(),
        };
        println!("{} {}", label, turn.text);
    }
    println!();
    Ok(())
}
