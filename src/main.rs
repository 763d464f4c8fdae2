// PetPal - pet care companion for the terminal
//
// Keeps track of pets, their daily care tasks, health records and training,
// and hosts an AI hub that answers care questions through Google Gemini.
//
// Architecture:
// - Navigation (nav): state machine over the app's screens, observed via watch
// - Chat (chat): per-visit conversations with at most one request in flight
// - Advice (advice): Gemini client behind a trait, offline fallback without a key
// - TUI (ratatui): screens, key handling and the event loop
// - Headless chat: the same chat session driven from stdin/stdout

mod advice;
mod chat;
mod cli;
mod config;
mod data;
mod headless;
mod logging;
mod nav;
mod tui;
mod util;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use data::Dataset;
use logging::{LogBuffer, LogSink};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Commands that need neither logging nor the advisor
    match cli.command {
        Some(Commands::Config { show, reset, path }) => return cli::handle_config(show, reset, path),
        Some(Commands::Pets) => return cli::handle_pets(&Dataset::mock()),
        _ => {}
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();
    let config = Config::load()?;

    // TUI mode captures logs in memory so they don't garble the display
    let log_buffer = LogBuffer::new();
    let sink = match cli.command {
        Some(Commands::Chat { .. }) => LogSink::Stderr,
        _ => LogSink::Buffer(log_buffer.clone()),
    };
    // Keep the guard alive so file logs flush on exit
    let _file_guard = logging::init_tracing(&config.logging, sink);

    let advisor = advice::create_advisor(&config.advice);
    tracing::info!(
        advisor = advisor.name(),
        ready = advisor.is_ready(),
        "PetPal {} starting",
        config::VERSION
    );

    match cli.command {
        Some(Commands::Chat { pet }) => {
            headless::run_chat(&Dataset::mock(), pet.as_deref(), advisor).await?;
        }
        _ => {
            tui::run_tui(config, log_buffer, advisor).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
