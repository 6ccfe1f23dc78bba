use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use url::Url;

use crate::Result;

pub mod credentials;

pub use credentials::{CredentialSource, EnvCredential, StaticCredential};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Relay server settings
    pub server: ServerConfig,

    /// Transcription provider settings
    pub provider: ProviderConfig,

    /// Client (form controller) settings
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Address the relay endpoint listens on
    pub bind_addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    /// Base URL of the Gemini API
    pub endpoint: String,

    /// Model used for `generateContent`
    pub model: String,

    /// Environment variable holding the API key. The key itself is never written to disk.
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the relay server the client talks to
    pub relay_url: String,

    /// Keep the last successful result between runs
    pub persist_last_result: bool,

    /// Override for the persisted result file
    pub store_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_addr: "127.0.0.1:5000".to_string(),
            },
            provider: ProviderConfig {
                endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                model: "gemini-2.0-flash-exp".to_string(),
                api_key_env: "GEMINI_API_KEY".to_string(),
            },
            client: ClientConfig {
                relay_url: "http://127.0.0.1:5000".to_string(),
                persist_last_result: true,
                store_path: None,
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Load and validate configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("yt-transcript").join("config.yaml"))
    }

    /// Default location of the persisted last result
    pub fn store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.client.store_path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir()
            .context("Could not determine data directory")?;

        Ok(data_dir.join("yt-transcript").join("youtube-transcript.json"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        Url::parse(&self.provider.endpoint)
            .with_context(|| format!("Invalid provider endpoint: {}", self.provider.endpoint))?;

        Url::parse(&self.client.relay_url)
            .with_context(|| format!("Invalid relay URL: {}", self.client.relay_url))?;

        if self.provider.model.trim().is_empty() {
            anyhow::bail!("Provider model must be configured");
        }

        if self.provider.api_key_env.trim().is_empty() {
            anyhow::bail!("Provider API key variable name must be configured");
        }

        Ok(())
    }

    /// Parsed server bind address
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.server.bind_addr))
    }

    /// Credential source reading the configured environment variable
    pub fn credentials(&self) -> EnvCredential {
        EnvCredential::new(&self.provider.api_key_env)
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Bind Address: {}", self.server.bind_addr);
        println!("  Provider Endpoint: {}", self.provider.endpoint);
        println!("  Provider Model: {}", self.provider.model);
        println!(
            "  API Key Variable: {} ({})",
            self.provider.api_key_env,
            if self.credentials().api_key().is_some() { "set" } else { "not set" }
        );
        println!("  Relay URL: {}", self.client.relay_url);
        println!("  Persist Last Result: {}", self.client.persist_last_result);
        if let Ok(path) = self.store_path() {
            println!("  Result File: {}", path.display());
        }
    }
}
