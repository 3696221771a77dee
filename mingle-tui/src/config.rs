use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Base URL the original web client shipped with; used when nothing
/// overrides it.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3001";

/// Server configuration stored locally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub server_url: String,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            last_updated: chrono::Utc::now(),
        }
    }
}

/// Configuration manager for the .mingle directory
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager rooted at `~/.mingle`
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;

        // Create .mingle directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create .mingle directory")?;
        }

        Ok(Self { config_dir })
    }

    /// Create a config manager rooted at an explicit directory
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Get the .mingle configuration directory path
    fn get_config_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home_dir.join(".mingle"))
    }

    /// Get the server config file path
    fn get_server_config_file(&self) -> PathBuf {
        self.config_dir.join("server.json")
    }

    /// Save server configuration
    pub fn save_server_config(&self, config: &ServerConfig) -> Result<()> {
        let config_file = self.get_server_config_file();
        let json =
            serde_json::to_string_pretty(config).context("Failed to serialize server config")?;

        fs::write(&config_file, json).context("Failed to write server config file")?;

        Ok(())
    }

    /// Load server configuration. A corrupted file is ignored rather than
    /// fatal, so a bad write can never lock the client out.
    pub fn load_server_config(&self) -> Result<Option<ServerConfig>> {
        let config_file = self.get_server_config_file();

        if !config_file.exists() {
            return Ok(None);
        }

        let json =
            fs::read_to_string(&config_file).context("Failed to read server config file")?;

        match serde_json::from_str(&json) {
            Ok(config) => Ok(Some(config)),
            Err(e) => {
                log::warn!("Server config file is corrupted ({}), ignoring", e);
                Ok(None)
            }
        }
    }

    /// Persist the server URL for future runs
    pub fn save_server_url(&self, server_url: String) -> Result<()> {
        let config = ServerConfig {
            server_url,
            last_updated: chrono::Utc::now(),
        };
        self.save_server_config(&config)
    }

    /// Determine the server URL to use based on priority:
    /// 1. CLI argument (highest priority)
    /// 2. Environment variable MINGLE_SERVER_URL
    /// 3. Saved configuration file
    /// 4. Built-in default (lowest priority)
    pub fn determine_server_url(&self, cli_override: Option<String>) -> Result<String> {
        // 1. CLI argument has highest priority
        if let Some(url) = cli_override {
            return Ok(url);
        }

        // 2. Environment variable
        if let Ok(url) = std::env::var("MINGLE_SERVER_URL") {
            return Ok(url);
        }

        // 3. Saved configuration file
        if let Some(config) = self.load_server_config()? {
            return Ok(config.server_url);
        }

        // 4. Built-in default
        Ok(DEFAULT_SERVER_URL.to_string())
    }
}
