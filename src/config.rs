use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::prompt::PromptTarget;
use crate::storage::StorageAdapter;

/// Status of config file loading
#[derive(Debug, Clone)]
pub enum ConfigLoadStatus {
    /// Config loaded successfully from existing file
    Loaded,
    /// Created default config file (first run)
    Created,
    /// Error occurred during loading, using defaults.
    Error(String),
}

/// Completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub model: String,
    /// Model for the Copilot target. Empty means `model`.
    pub copilot_model: String,
    /// Name of the environment variable holding the API key.
    /// The key itself is never written to the config file.
    pub api_key_env: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-pro".to_string(),
            copilot_model: "gemini-3-flash-preview".to_string(),
            api_key_env: "API_KEY".to_string(),
        }
    }
}

impl CompletionConfig {
    pub fn model_for(&self, target: PromptTarget) -> &str {
        match target {
            PromptTarget::Copilot if !self.copilot_model.trim().is_empty() => {
                self.copilot_model.trim()
            }
            _ => self.model.trim(),
        }
    }
}

/// Prompt compiler configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PromptConfig {
    pub target: PromptTarget,
}

/// History storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// History file. Empty means the platform data directory.
    pub path: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Expand `~` to home directory in a path string
    pub fn expand_tilde(path: &str) -> PathBuf {
        if let Some(stripped) = path.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(stripped);
        }
        PathBuf::from(path)
    }

    /// Storage adapter for the configured history file, falling back to the
    /// platform data directory, then the working directory.
    pub fn storage(&self) -> StorageAdapter {
        let configured = self.storage.path.trim();
        if !configured.is_empty() {
            return StorageAdapter::new(Self::expand_tilde(configured));
        }
        match project_dirs() {
            Some(dirs) => StorageAdapter::in_dir(dirs.data_dir()),
            None => {
                warn!("Could not determine data directory, using working directory");
                StorageAdapter::in_dir(Path::new("."))
            }
        }
    }
}

/// Loaded configuration with metadata
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub config_path: PathBuf,
    pub status: ConfigLoadStatus,
}

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "storyboard", "storyboard")
}

/// Get the full path to the config file
pub fn get_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load configuration from file, environment, and defaults
pub fn load_config() -> LoadedConfig {
    let config_path = match get_config_path() {
        Some(path) => path,
        None => {
            warn!("Could not determine config directory, using defaults");
            return LoadedConfig {
                config: apply_env_overrides(Config::default()),
                config_path: PathBuf::from("config.toml"),
                status: ConfigLoadStatus::Error("Could not determine config directory".to_string()),
            };
        }
    };

    debug!(path = ?config_path, "config_path");
    load_config_from(config_path)
}

fn load_config_from(config_path: PathBuf) -> LoadedConfig {
    let (config, status) = load_or_create_config(&config_path);
    LoadedConfig {
        config: apply_env_overrides(config),
        config_path,
        status,
    }
}

/// Save a config to the given file path.
pub fn save_config(config: &Config, config_path: &Path) -> Result<(), String> {
    let toml_content = toml::to_string_pretty(config).map_err(|e| {
        warn!(error = %e, "config_save_serialize_failed");
        format!("Failed to serialize config: {}", e)
    })?;

    if let Some(parent) = config_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| {
            warn!(path = ?parent, error = %e, "config_save_mkdir_failed");
            format!("Failed to create config directory: {}", e)
        })?;
    }

    fs::write(config_path, &toml_content).map_err(|e| {
        warn!(path = ?config_path, error = %e, "config_save_write_failed");
        format!("Failed to write config: {}", e)
    })?;

    info!(path = ?config_path, "config_saved");
    Ok(())
}

/// Load config from file, or create default if not exists
fn load_or_create_config(config_path: &Path) -> (Config, ConfigLoadStatus) {
    match fs::read_to_string(config_path) {
        Ok(contents) => match toml::from_str::<Config>(&contents) {
            Ok(config) => {
                info!(path = ?config_path, "config_loaded");
                (config, ConfigLoadStatus::Loaded)
            }
            Err(e) => {
                warn!(path = ?config_path, error = %e, "config_malformed");
                (
                    Config::default(),
                    ConfigLoadStatus::Error(format!("Malformed TOML: {}", e)),
                )
            }
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => create_default_config(config_path),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            warn!(path = ?config_path, "config_permission_denied");
            (
                Config::default(),
                ConfigLoadStatus::Error("Permission denied reading config".to_string()),
            )
        }
        Err(e) => {
            warn!(path = ?config_path, error = %e, "config_read_failed");
            (
                Config::default(),
                ConfigLoadStatus::Error(format!("Read error: {}", e)),
            )
        }
    }
}

/// Create the default config file
fn create_default_config(config_path: &Path) -> (Config, ConfigLoadStatus) {
    let config = Config::default();
    match save_config(&config, config_path) {
        Ok(()) => {
            info!(path = ?config_path, "config_created");
            (config, ConfigLoadStatus::Created)
        }
        Err(e) => {
            warn!(path = ?config_path, error = %e, "config_create_failed");
            (config, ConfigLoadStatus::Error(e))
        }
    }
}

/// Apply environment variable overrides to config
fn apply_env_overrides(config: Config) -> Config {
    apply_overrides(config, |key| env::var(key).ok())
}

fn apply_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(endpoint) = lookup("STORYBOARD_ENDPOINT") {
        debug!("Overriding completion.endpoint from STORYBOARD_ENDPOINT");
        config.completion.endpoint = endpoint;
    }

    if let Some(model) = lookup("STORYBOARD_MODEL") {
        debug!("Overriding completion.model from STORYBOARD_MODEL");
        config.completion.model = model;
    }

    if let Some(model) = lookup("STORYBOARD_COPILOT_MODEL") {
        debug!("Overriding completion.copilot_model from STORYBOARD_COPILOT_MODEL");
        config.completion.copilot_model = model;
    }

    if let Some(path) = lookup("STORYBOARD_STORAGE") {
        debug!("Overriding storage.path from STORYBOARD_STORAGE");
        config.storage.path = path;
    }

    if let Some(level) = lookup("STORYBOARD_LOG") {
        debug!("Overriding logging.level from STORYBOARD_LOG");
        config.logging.level = level;
    }

    config
}
