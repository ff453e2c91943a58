use crate::config::{CompatConfig, Config, DEFAULT_NATIVE_BASE_URL, NativeConfig};
use anyhow::Result;
use clap::Parser;
use std::path::Path;

/// Command-line arguments for responses-relay
#[derive(Parser, Debug, Default)]
#[command(name = "responses-relay")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Address to listen on (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Base URL of an OpenAI-compatible chat completions backend (overrides compat.base_url)
    #[arg(long, env = "OLLAMA_BASE_URL")]
    pub compat_base_url: Option<String>,

    /// API key for a native Responses backend (overrides native.api_key)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub native_api_key: Option<String>,

    /// Base URL of the native Responses backend (overrides native.base_url)
    #[arg(long)]
    pub native_base_url: Option<String>,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate that the config file exists
    pub fn validate_config_path(&self) -> Result<()> {
        let config_path = Path::new(&self.config);

        if !config_path.exists() {
            return Err(anyhow::anyhow!(
                "Configuration file does not exist: {}\n\
                 Please create a config.toml file or specify a valid path with --config",
                self.config
            ));
        }

        if !config_path.is_file() {
            return Err(anyhow::anyhow!(
                "Configuration path is not a file: {}",
                self.config
            ));
        }

        Ok(())
    }

    /// Apply command-line and environment overrides on top of the file configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        if let Some(ref base_url) = self.compat_base_url {
            config.compat = Some(CompatConfig {
                base_url: base_url.clone(),
            });
        }

        if let Some(ref api_key) = self.native_api_key {
            let base_url = config
                .native
                .as_ref()
                .map(|n| n.base_url.clone())
                .unwrap_or_else(|| DEFAULT_NATIVE_BASE_URL.to_string());
            config.native = Some(NativeConfig {
                api_key: api_key.clone(),
                base_url,
            });
        }

        if let Some(ref base_url) = self.native_base_url {
            if let Some(native) = config.native.as_mut() {
                native.base_url = base_url.clone();
            }
        }
    }
}
