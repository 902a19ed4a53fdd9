//! Configuration loading and types

use crate::utils::errors::{ConvertError, ConvertResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure, loaded from a TOML file. A missing file
/// is not an error; every section has working defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub marketplace: MarketplaceConfig,
    pub gemini: GeminiConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory generated plugins are written to
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "./plugins".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    pub name: String,
    pub owner: String,
    pub description: String,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            name: crate::marketplace::DEFAULT_NAME.to_string(),
            owner: crate::marketplace::DEFAULT_OWNER.to_string(),
            description: crate::marketplace::DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Enhancement toggle; an absent API key also disables it
    pub enabled: bool,
    pub api_key: Option<String>,
    pub model: String,
    /// API base URL override; `None` uses the public Gemini endpoint
    pub endpoint: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            model: crate::enhancer::gemini::DEFAULT_MODEL.to_string(),
            endpoint: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> ConvertResult<Self> {
        let expanded = shellexpand::tilde(path).to_string();
        let path = Path::new(&expanded);
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConvertError::Config(format!("failed to read config: {}", e)))?;
        toml::from_str(&content)
            .map_err(|e| ConvertError::Config(format!("failed to parse config: {}", e)))
    }

    /// Enhancement credential: config file first, `GEMINI_API_KEY` env
    /// var second. `None` means enhancement is disabled, not an error.
    pub fn gemini_api_key(&self) -> Option<String> {
        self.gemini
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .filter(|key| !key.is_empty())
    }
}
