//! Configuration for PetPal
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/petpal/config.toml)
//! 3. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod advice;
mod logging;
mod serialization;


pub use advice::{AdviceConfig, FileAdvice};
pub use logging::{FileLogging, LogRotation, LoggingConfig};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variables consulted for the Gemini key, first match wins
const API_KEY_VARS: [&str; 2] = ["PETPAL_API_KEY", "GEMINI_API_KEY"];

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Config {
    /// Name shown in the dashboard greeting
    pub user_name: String,

    /// Advice backend (Gemini)
    pub advice: AdviceConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_name: "Alex".to_string(),
            advice: AdviceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub user_name: Option<String>,

    /// Optional [advice] section
    pub advice: Option<FileAdvice>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// ~/.config/petpal/config.toml on every platform
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("petpal").join("config.toml"))
    }

    /// Write the default config on first run so users can discover the options.
    /// Failures are logged and otherwise ignored; the file is optional.
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };
        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::debug!("Could not create config directory {:?}: {}", parent, e);
                return;
            }
        }

        if let Err(e) = std::fs::write(&path, Self::default().to_toml()) {
            tracing::debug!("Could not write default config {:?}: {}", path, e);
        }
    }

    /// Parse config file contents
    pub(crate) fn parse_file(contents: &str) -> Result<FileConfig> {
        toml::from_str(contents).context("Invalid TOML in config file")
    }

    /// Read the config file if present. A file that exists but cannot be read
    /// or parsed is an error: silently falling back to defaults would hide it.
    fn load_file_config() -> Result<FileConfig> {
        let Some(path) = Self::config_path() else {
            return Ok(FileConfig::default());
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse_file(&contents)
                .with_context(|| format!("Failed to load {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e).with_context(|| format!("Cannot read {}", path.display())),
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn load() -> Result<Self> {
        let file = Self::load_file_config()?;
        Ok(Self::from_sources(file, |key| std::env::var(key).ok()))
    }

    /// Merge a parsed file with an environment lookup
    pub(crate) fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let user_name = env("PETPAL_USER")
            .or(file.user_name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(defaults.user_name);

        let env_api_key = API_KEY_VARS.iter().find_map(|key| env(*key));
        let advice = AdviceConfig::from_file(file.advice, env_api_key);

        let mut logging = LoggingConfig::from_file(file.logging);
        if let Some(level) = env("PETPAL_LOG_LEVEL") {
            logging.level = level;
        }

        Self {
            user_name,
            advice,
            logging,
        }
    }
}
