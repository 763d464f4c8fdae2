//! Advice backend configuration

use serde::Deserialize;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const MIN_TIMEOUT_SECS: u64 = 1;

#[derive(Debug, Clone)]
pub struct AdviceConfig {
    pub model: String,
    pub api_base: String,
    /// Never written back to the config file by `to_toml`
    pub api_key: Option<String>,
    /// Request timeout, at least one second
    pub timeout_secs: u64,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// `[advice]` as loaded from the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileAdvice {
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl AdviceConfig {
    /// File values over defaults; an API key from the environment wins over the file
    pub fn from_file(file: Option<FileAdvice>, env_api_key: Option<String>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            model: file.model.unwrap_or(defaults.model),
            api_base: file.api_base.unwrap_or(defaults.api_base),
            api_key: env_api_key
                .or(file.api_key)
                .filter(|key| !key.trim().is_empty()),
            // A zero timeout would fail every request before it is sent
            timeout_secs: file
                .timeout_secs
                .unwrap_or(defaults.timeout_secs)
                .max(MIN_TIMEOUT_SECS),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
