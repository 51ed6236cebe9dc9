use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Debrief";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable that overrides `gemini.api_key` from the settings file.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8484";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot determine home directory")]
    HomeDirNotFound,

    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("No Gemini API key configured (set GEMINI_API_KEY or gemini.api_key in settings.json)")]
    MissingApiKey,

    #[error("Invalid bind address '{0}'")]
    InvalidBindAddr(String),
}

/// Get the application data directory
/// ~/Debrief/ on all platforms
pub fn app_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(APP_NAME))
        .ok_or(ConfigError::HomeDirNotFound)
}

/// Get the settings file path
pub fn settings_file() -> Result<PathBuf, ConfigError> {
    Ok(app_data_dir()?.join("settings.json"))
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "debrief_lib=info,debrief=info,tower_http=warn"
}

// ═══════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════

/// Runtime settings, read from `~/Debrief/settings.json`.
///
/// Every field has a default so a partial file (or no file at all) is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind_addr: String,
    pub gemini: GeminiSettings,
    pub generation: GenerationSettings,
    pub chart: ChartSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            gemini: GeminiSettings::default(),
            generation: GenerationSettings::default(),
            chart: ChartSettings::default(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Sampling parameters forwarded as `generationConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
        }
    }
}

impl Settings {
    /// Load settings from the default location, applying the env override.
    pub fn load() -> Result<Self, ConfigError> {
        let path = settings_file()?;
        let env_key = std::env::var(API_KEY_ENV).ok();
        Self::load_from(&path, env_key)
    }

    /// Load settings from `path` (missing file means defaults).
    ///
    /// A non-empty `env_key` replaces whatever key the file holds.
    pub fn load_from(path: &Path, env_key: Option<String>) -> Result<Self, ConfigError> {
        let mut settings = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            Settings::default()
        };

        if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
            settings.gemini.api_key = key.trim().to_string();
        }

        Ok(settings)
    }

    /// Check the settings are usable for serving.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gemini.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(self.bind_addr.clone()))
    }
}
