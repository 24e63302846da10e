// src/config.rs
//! Configuration management with per-user file storage

use crate::error::{GpsuError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How each input line carries the 16 field bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputEncoding {
    /// The line is the field itself
    #[default]
    Ascii,
    /// The line is 32 hex digits
    Hex,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    pub input: InputEncoding,
    pub output: OutputFormat,
    pub log_level: Option<String>,
}

impl DecoderConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load configuration from `path`, falling back to defaults when it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            GpsuError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            GpsuError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                GpsuError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self)?;

        std::fs::write(path, contents)
            .map_err(|e| GpsuError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get config file path for Unix systems
    #[cfg(not(windows))]
    pub fn get_config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| GpsuError::Config("HOME environment variable not set".to_string()))?;

        Ok(PathBuf::from(home)
            .join(".config")
            .join("gpsu-decode")
            .join("config.json"))
    }

    /// Get config file path for Windows
    #[cfg(windows)]
    pub fn get_config_path() -> Result<PathBuf> {
        let appdata = std::env::var("APPDATA")
            .map_err(|_| GpsuError::Config("APPDATA environment variable not set".to_string()))?;

        Ok(PathBuf::from(appdata).join("gpsu-decode").join("config.json"))
    }

    pub fn update_input(&mut self, input: InputEncoding) {
        self.input = input;
    }

    pub fn update_output(&mut self, output: OutputFormat) {
        self.output = output;
    }
}
