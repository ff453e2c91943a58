use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::time::Duration;

pub const DEFAULT_NATIVE_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    /// OpenAI-compatible chat completions backend (e.g. Ollama).
    #[serde(default)]
    pub compat: Option<CompatConfig>,
    /// Backend speaking the Responses API natively.
    #[serde(default)]
    pub native: Option<NativeConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Timeout applied to every outbound backend call. Transport default when unset.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CompatConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NativeConfig {
    pub api_key: String,
    #[serde(default = "default_native_base_url")]
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_native_base_url() -> String {
    DEFAULT_NATIVE_BASE_URL.to_string()
}

impl ServerConfig {
    /// The outbound timeout. `0` is treated as unset.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let contents =
            fs::read_to_string(path).context(format!("Failed to read config file: {}", path))?;

        let config: Config =
            toml::from_str(&contents).context("Failed to parse config file as TOML")?;

        Ok(config)
    }

    /// The compatibility base URL, if one is set and not blank.
    pub fn compat_base_url(&self) -> Option<&str> {
        self.compat
            .as_ref()
            .map(|c| c.base_url.trim())
            .filter(|url| !url.is_empty())
    }

    /// The native backend settings, if a non-blank API key is set.
    pub fn native_credentials(&self) -> Option<&NativeConfig> {
        self.native
            .as_ref()
            .filter(|n| !n.api_key.trim().is_empty())
    }
}
