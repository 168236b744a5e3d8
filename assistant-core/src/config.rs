use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{info, warn};

pub const WEATHER_API_KEY_VAR: &str = "WEATHER_API_KEY";
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const GEMINI_MODEL_VAR: &str = "GEMINI_MODEL";
pub const PROMPT_PATH_VAR: &str = "WEATHER_ASSISTANT_PROMPT";

const DEFAULT_PROMPT_FILE: &str = "prompt.txt";

/// Used when the prompt file is missing or unreadable.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful weather assistant. \
Given weather data, provide a short, friendly recommendation \
and practical insights about the current conditions. \
Keep your response concise and useful.";

/// Settings for the assistant, stored on disk as TOML and overridable from the environment.
///
/// Example TOML:
/// ```toml
/// weather_api_key = "..."
/// gemini_api_key = "..."
/// gemini_model = "gemini-2.5-flash"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub weather_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub weather_base_url: String,
    pub gemini_base_url: String,
    /// Timeout for each weather-provider request.
    pub request_timeout_secs: u64,
    pub prompt_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weather_api_key: None,
            gemini_api_key: None,
            gemini_model: "gemini-2.5-flash".to_string(),
            weather_base_url: "https://api.openweathermap.org".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            request_timeout_secs: 10,
            prompt_path: None,
        }
    }
}

/// Both API keys, present and non-empty.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub weather_api_key: String,
    pub gemini_api_key: String,
}

impl Config {
    /// Load `.env`, then the config file (if any), then environment overrides.
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            info!(path = %path.display(), "Loaded .env");
        }

        let mut cfg = Self::load_file(&Self::config_file_path()?)?;
        cfg.apply_env(|key| env::var(key).ok());
        Ok(cfg)
    }

    /// Read the TOML file at `path`, or return defaults if it doesn't exist yet.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Overlay values found through `lookup`; blank values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(WEATHER_API_KEY_VAR) {
            self.weather_api_key = Some(key);
        }
        if let Some(key) = get(GEMINI_API_KEY_VAR) {
            self.gemini_api_key = Some(key);
        }
        if let Some(model) = get(GEMINI_MODEL_VAR) {
            self.gemini_model = model;
        }
        if let Some(path) = get(PROMPT_PATH_VAR) {
            self.prompt_path = Some(PathBuf::from(path));
        }
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-assistant", "weather-assistant")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn credentials(&self) -> Result<Credentials> {
        let weather_api_key = required(&self.weather_api_key, WEATHER_API_KEY_VAR, "Weather")?;
        let gemini_api_key = required(&self.gemini_api_key, GEMINI_API_KEY_VAR, "Gemini")?;

        Ok(Credentials {
            weather_api_key,
            gemini_api_key,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// System instruction from the configured prompt file, or the built-in fallback.
    pub fn system_prompt(&self) -> String {
        let path = self
            .prompt_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROMPT_FILE));
        load_system_prompt(&path)
    }
}

fn required(value: &Option<String>, var: &str, label: &str) -> Result<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| {
            anyhow!(
                "No {label} API key provided. Set {var} in your environment or .env file.\n\
                 Hint: run `weather-assistant configure` to store it in the config file."
            )
        })
}

/// Read the system prompt from `path`.
///
/// An empty file yields an empty prompt; a missing or unreadable file yields
/// [`DEFAULT_SYSTEM_PROMPT`].
pub fn load_system_prompt(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let contents = contents.trim();
            if contents.is_empty() {
                warn!(path = %path.display(), "Prompt file is empty");
            } else {
                info!(path = %path.display(), "Loaded system prompt");
            }
            contents.to_string()
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Could not load prompt file, using built-in default prompt"
            );
            DEFAULT_SYSTEM_PROMPT.to_string()
        }
    }
}
