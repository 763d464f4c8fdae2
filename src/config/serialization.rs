//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the config as a commented TOML document. The API key is never
    /// written; it belongs in the environment.
    pub fn to_toml(&self) -> String {
        format!(
            r#"# petpal configuration

# Name used in the dashboard greeting
user_name = "{user_name}"

# AI hub backend (Google Gemini generateContent API)
# Set the key with PETPAL_API_KEY or GEMINI_API_KEY; without one the hub runs offline.
[advice]
model = "{model}"
api_base = "{api_base}"
timeout_secs = {timeout}
# api_key = "..."

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# File logging (in addition to TUI buffer or stderr)
file_enabled = {file_enabled}
file_dir = "{file_dir}"
file_rotation = "{file_rotation}"  # hourly, daily, never
file_prefix = "{file_prefix}"
"#,
            user_name = escape(&self.user_name),
            model = escape(&self.advice.model),
            api_base = escape(&self.advice.api_base),
            timeout = self.advice.timeout_secs,
            log_level = escape(&self.logging.level),
            file_enabled = self.logging.file_enabled,
            file_dir = escape(&self.logging.file_dir.display().to_string()),
            file_rotation = self.logging.file_rotation.as_str(),
            file_prefix = escape(&self.logging.file_prefix),
        )
    }
}

/// Escape a value for a TOML basic string
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
