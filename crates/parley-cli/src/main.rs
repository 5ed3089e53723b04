use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "parley")]
#[command(author, version, about = "Chat with a tool-using language model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./parley.toml, then ~/.parley/config.toml)
    #[arg(short, long, global = true, env = "PARLEY_CONFIG")]
    config: Option<PathBuf>,

    /// Model provider: openai or gemini
    #[arg(long, global = true)]
    provider: Option<String>,

    #[arg(short, long, global = true)]
    model: Option<String>,

    /// API key. Falls back to the provider's usual environment variable.
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session
    Chat {
        /// System prompt for the agent
        #[arg(short, long)]
        system: Option<String>,
        /// Resume a named session
        #[arg(long)]
        session: Option<String>,
    },
    /// Answer a single message and exit
    Run {
        /// The message to send
        message: String,
        /// System prompt for the agent
        #[arg(short, long)]
        system: Option<String>,
    },
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
        /// System prompt for the agent
        #[arg(short, long)]
        system: Option<String>,
    },
    /// List the tools the agent can call
    Tools,
}

fn init_tracing(verbose: u8, configured: &str) {
    let level = match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = commands::Overrides {
        provider: cli.provider,
        model: cli.model,
        api_key: cli.api_key,
    };
    let settings = commands::Settings::load(cli.config.as_deref(), overrides)?;
    init_tracing(cli.verbose, settings.config.log.level.as_filter());

    match cli.command {
        Commands::Chat { system, session } => {
            commands::chat::run(&settings, system.as_deref(), session).await?;
        }
        Commands::Run { message, system } => {
            commands::run::run(&settings, system.as_deref(), &message).await?;
        }
        Commands::Serve { host, port, system } => {
            commands::serve::run(&settings, system.as_deref(), host, port).await?;
        }
        Commands::Tools => {
            commands::tools::run(&settings)?;
        }
    }

    Ok(())
}
