//! Configuration module for the sltt CLI.
//!
//! This module handles loading, saving, and managing configuration
//! settings for the sltt application.

use dirs::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SlttError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "sltt.toml";

/// Application configuration structure.
///
/// This struct represents the complete configuration for the sltt CLI,
/// including global settings and command-specific options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Global verbose setting.
    #[serde(default)]
    pub verbose: bool,

    /// Default output directory.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Default input directory.
    #[serde(default = "default_input_dir")]
    pub input_dir: String,

    /// Translate-specific configuration.
    #[serde(default)]
    pub translate: TranslateConfig,
}

/// Translate-specific configuration options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslateConfig {
    /// Name of the runtime support class emitted calls are routed through.
    #[serde(default = "default_support_class")]
    pub support_class_name: String,

    /// Identifier casing applied to translated names: `"lowercase"` or
    /// `"preserve"`.
    #[serde(default = "default_rewrite")]
    pub rewrite: String,

    /// Escalate translation warnings to hard failures.
    #[serde(default)]
    pub warnings_as_errors: bool,
}

/// Default value functions for configuration fields.
fn default_output_dir() -> String {
    "output".to_string()
}

fn default_input_dir() -> String {
    "input".to_string()
}

fn default_support_class() -> String {
    "support".to_string()
}

fn default_rewrite() -> String {
    "lowercase".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            output_dir: default_output_dir(),
            input_dir: default_input_dir(),
            translate: TranslateConfig::default(),
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            support_class_name: default_support_class(),
            rewrite: default_rewrite(),
            warnings_as_errors: false,
        }
    }
}

impl TranslateConfig {
    /// Resolve the configured rewrite name into a `sltc_drv::NameRewrite`.
    pub fn name_rewrite(&self) -> Result<sltc_drv::NameRewrite> {
        match self.rewrite.to_lowercase().as_str() {
            "lowercase" => Ok(sltc_drv::NameRewrite::Lowercase),
            "preserve" => Ok(sltc_drv::NameRewrite::Preserve),
            other => Err(SlttError::Config(format!(
                "unknown name rewrite '{other}', expected 'lowercase' or 'preserve'"
            ))),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Searches for configuration in the following order:
    /// 1. Current directory
    /// 2. User's home directory
    /// 3. System configuration directory
    ///
    /// Returns the default configuration if no config file is found.
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        match config_path {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Result<Config>` - The loaded configuration or an error
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SlttError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| SlttError::Config(format!("Failed to parse configuration: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a specific path.
    ///
    /// # Arguments
    /// * `path` - Path where the configuration should be saved
    ///
    /// # Returns
    /// * `Result<()>` - Success or an error
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| SlttError::Config(format!("Failed to serialize configuration: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check for config in current directory.
    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    /// Check for config in home directory.
    fn check_home_config() -> Option<PathBuf> {
        home_dir()
            .map(|dir| dir.join(".config").join("sltt").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    /// Check for config in system config directory.
    fn check_system_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("sltt").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    /// Find the configuration file in standard locations.
    ///
    /// # Returns
    /// * `Result<Option<PathBuf>>` - Path to config file if found, None otherwise
    fn find_config_file() -> Result<Option<PathBuf>> {
        Ok(Self::check_current_dir_config()
            .or_else(Self::check_home_config)
            .or_else(Self::check_system_config))
    }
}
