// CLI module - command-line argument parsing and handlers
//
// With no subcommand the TUI starts. Subcommands:
// - chat [--pet ID]: line-based chat with the pet care assistant
// - pets: list the pets known to the app
// - config --show/--reset/--path: configuration management

use crate::config::{Config, VERSION};
use crate::data::Dataset;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;

/// PetPal - pet care companion for the terminal
#[derive(Parser)]
#[command(name = "petpal")]
#[command(version = VERSION)]
#[command(about = "Pet care companion with an AI advice hub", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chat with the pet care assistant on stdin/stdout
    Chat {
        /// Pet id to give the assistant context (see `petpal pets`)
        #[arg(long)]
        pet: Option<String>,
    },

    /// List pets
    Pets,

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

pub fn handle_config(show: bool, reset: bool, path: bool) -> Result<()> {
    if path {
        handle_config_path()
    } else if show {
        handle_config_show()
    } else if reset {
        handle_config_reset()
    } else {
        println!("Usage: petpal config [--show|--reset|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --path    Show config file path");
        Ok(())
    }
}

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show() -> Result<()> {
    let config = Config::load()?;

    println!("# Effective configuration (env > file > defaults)");
    println!();
    println!("user_name = {:?}", config.user_name);
    println!();
    println!("[advice]");
    println!("model = {:?}", config.advice.model);
    println!("api_base = {:?}", config.advice.api_base);
    println!("timeout_secs = {}", config.advice.timeout_secs);
    println!(
        "api_key = {}",
        if config.advice.has_api_key() {
            "(set)"
        } else {
            "(not set, offline mode)"
        }
    );
    println!();
    println!("[logging]");
    println!("level = {:?}", config.logging.level);
    println!("file_enabled = {}", config.logging.file_enabled);
    println!("file_dir = {:?}", config.logging.file_dir.display().to_string());
    println!("file_rotation = {:?}", config.logging.file_rotation.as_str());
    println!("file_prefix = {:?}", config.logging.file_prefix);

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
    Ok(())
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating directory {}", parent.display()))?;
    }

    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Error writing config {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

pub fn handle_pets(data: &Dataset) -> Result<()> {
    if data.pets().is_empty() {
        bail!("No pets registered");
    }

    println!("{:<4} {:<10} {:<6} {:<20} {:>4} {:>8}  NEXT VET", "ID", "NAME", "KIND", "BREED", "AGE", "WEIGHT");
    for pet in data.pets() {
        println!(
            "{:<4} {:<10} {:<6} {:<20} {:>4} {:>6.1}kg  {}",
            pet.id,
            pet.name,
            pet.kind.to_string(),
            pet.breed,
            pet.age,
            pet.weight_kg,
            pet.next_vet_visit
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chat_with_pet() {
        let cli = Cli::try_parse_from(["petpal", "chat", "--pet", "p2"]).unwrap();
        match cli.command {
            Some(Commands::Chat { pet }) => assert_eq!(pet.as_deref(), Some("p2")),
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn test_no_subcommand_runs_tui() {
        let cli = Cli::try_parse_from(["petpal"]).unwrap();
        assert!(cli.command.is_none());
    }
}
