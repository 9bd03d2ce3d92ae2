//! tidechat CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Initialize the config directory
//! - `chat`    — Interactive chat or single-message mode

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "tidechat",
    about = "tidechat — terminal chat client for OpenAI-compatible LLM endpoints",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Chat with the model
    Chat(commands::chat::ChatOptions),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Chat(opts) => commands::chat::run(opts).await?,
    }

    Ok(())
}
