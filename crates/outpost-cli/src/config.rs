//! Configuration file management for outpost.
//!
//! Provides a TOML-based config file at `~/.config/outpost/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use outpost_db::config::DbConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
    #[serde(default)]
    pub storage: StorageSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StorageSection {
    /// Directory that `media add` copies uploaded files into.
    pub media_dir: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            media_dir: default_media_dir(),
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the outpost config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/outpost` or `~/.config/outpost`.
/// We intentionally ignore the platform-specific `dirs::config_dir()`
/// (which returns `~/Library/Application Support` on macOS).
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("outpost");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("outpost")
}

/// Return the path to the outpost config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Default managed media directory: `$XDG_DATA_HOME/outpost/media` or
/// `~/.local/share/outpost/media`.
pub fn default_media_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join("outpost").join("media");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local")
        .join("share")
        .join("outpost")
        .join("media")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct OutpostConfig {
    pub db_config: DbConfig,
    pub media_dir: PathBuf,
}

impl OutpostConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config
    /// file > default.
    ///
    /// - DB URL: `cli_db_url` > `OUTPOST_DATABASE_URL` env >
    ///   `config_file.database.url` > `DbConfig::DEFAULT_URL`
    /// - Media dir: `OUTPOST_MEDIA_DIR` env > `config_file.storage.media_dir`
    ///   > XDG data default
    pub fn resolve(cli_db_url: Option<&str>) -> Result<Self> {
        let file_config = load_config().ok();

        let db_url = if let Some(url) = cli_db_url {
            url.to_string()
        } else if let Ok(url) = std::env::var("OUTPOST_DATABASE_URL") {
            url
        } else if let Some(ref cfg) = file_config {
            cfg.database.url.clone()
        } else {
            DbConfig::DEFAULT_URL.to_string()
        };
        let db_config = DbConfig::new(db_url);

        let media_dir = if let Ok(dir) = std::env::var("OUTPOST_MEDIA_DIR") {
            PathBuf::from(dir)
        } else if let Some(ref cfg) = file_config {
            cfg.storage.media_dir.clone()
        } else {
            default_media_dir()
        };

        Ok(Self {
            db_config,
            media_dir,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
