//! TOML-based configuration persistence for the agent.
//!
//! Reads and writes `AppConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\DeskPet\config.toml`
//! - Linux:    `~/.config/deskpet/config.toml`
//! - macOS:    `~/Library/Application Support/DeskPet/config.toml`
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent from the TOML file, so the agent
//! works on first run (before a config file exists) and when upgrading from
//! an older file that is missing newer fields.

use std::path::PathBuf;

use deskpet_core::KeySupportTable;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level agent configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Settings describing the loaded pet model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// Delay, in seconds, before a synthetic release is emitted for ordinary
    /// key presses on platforms with unreliable native release delivery.
    #[serde(default = "default_auto_release_delay")]
    pub auto_release_delay: f64,
    /// Canonical key names the model's artwork can display.
    #[serde(default = "default_supported_keys")]
    pub supported_keys: Vec<String>,
}

/// Overlay window behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowConfig {
    /// Hide the overlay while the (virtual) cursor hovers over it.
    #[serde(default)]
    pub hide_on_hover: bool,
    /// Let pointer input pass through to windows beneath the overlay.
    #[serde(default)]
    pub pass_through: bool,
}

/// General agent behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ModelConfig {
    /// Builds the read-only support table handed to the key normalizer.
    pub fn support_table(&self) -> KeySupportTable {
        KeySupportTable::from_keys(self.supported_keys.iter().cloned())
    }
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_auto_release_delay() -> f64 {
    1.0
}
fn default_log_level() -> String {
    "info".to_string()
}

/// The stock model's key vocabulary: letters, digits, the modifier families,
/// a collapsed `Fn`, and the handful of named keys the artwork draws.
fn default_supported_keys() -> Vec<String> {
    let mut keys: Vec<String> = ('A'..='Z').map(|c| c.to_string()).collect();
    keys.extend(('0'..='9').map(|c| c.to_string()));
    keys.extend(
        [
            "Meta", "Shift", "Alt", "Control", "Fn", "CapsLock", "Space", "Enter", "Escape",
            "Backspace", "Tab", "Delete", "ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight",
        ]
        .map(String::from),
    );
    keys
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            window: WindowConfig::default(),
            agent: AgentConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            auto_release_delay: default_auto_release_delay(),
            supported_keys: default_supported_keys(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            hide_on_hover: false,
            pass_through: false,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot
/// be determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from disk, returning `AppConfig::default()` if the file
/// does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] for invalid TOML.
pub fn load() -> Result<AppConfig, ConfigError> {
    let path = config_file_path()?;
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(source) => return Err(ConfigError::Io { path, source }),
    };
    Ok(toml::from_str(&text)?)
}

/// Writes `AppConfig` to disk, creating the config directory if needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors and
/// [`ConfigError::Serialize`] if the config cannot be rendered as TOML.
pub fn save(config: &AppConfig) -> Result<(), ConfigError> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
        path: dir.clone(),
        source,
    })?;
    let path = config_file_path()?;
    let text = toml::to_string_pretty(config)?;
    std::fs::write(&path, text).map_err(|source| ConfigError::Io { path, source })
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|base| PathBuf::from(base).join("DeskPet"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("deskpet"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library/Application Support/DeskPet"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}
