//! Bot configuration loading from config.toml
//!
//! The config file holds the bot token, the guild the commands are registered
//! in, and the role allowed to manage listings. On first run a file with
//! placeholder values is written and startup stops until it has been filled in.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Config file used when `DOWNLOAD_DESK_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "DOWNLOAD_DESK_CONFIG";

/// Environment variable overriding the token from the config file.
pub const TOKEN_ENV: &str = "DISCORD_BOT_TOKEN";

/// Listings file used when the config does not name one.
pub const DEFAULT_LISTINGS_PATH: &str = "listings.json";

/// Token written into a fresh config file.
pub const PLACEHOLDER_TOKEN: &str = "YOUR_BOT_TOKEN_HERE";

/// Snowflake written into a fresh config file.
pub const PLACEHOLDER_ID: &str = "1234567890";

/// The config file exactly as written on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Discord bot token
    pub token: String,
    /// Guild the slash commands are registered in
    pub guild_id: String,
    /// Role allowed to create, edit, delete and re-gate listings
    pub manager_role_id: String,
    /// Where listings are persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listings_path: Option<String>,
}

impl ConfigFile {
    /// Contents of a freshly created config file.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            token: PLACEHOLDER_TOKEN.to_string(),
            guild_id: PLACEHOLDER_ID.to_string(),
            manager_role_id: PLACEHOLDER_ID.to_string(),
            listings_path: None,
        }
    }
}

/// Validated configuration the bot runs with.
#[derive(Clone)]
pub struct AppConfig {
    /// Discord bot token
    pub token: String,
    /// Guild the slash commands are registered in
    pub guild_id: u64,
    /// Role allowed to manage listings
    pub manager_role_id: u64,
    /// Where listings are persisted
    pub listings_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("token", &"<redacted>")
            .field("guild_id", &self.guild_id)
            .field("manager_role_id", &self.manager_role_id)
            .field("listings_path", &self.listings_path)
            .finish()
    }
}

impl AppConfig {
    /// Validates `file`, letting `token_override` replace its token.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the token is missing or still the
    /// placeholder, or if either id is a placeholder or not a valid snowflake.
    pub fn from_file(file: ConfigFile, token_override: Option<String>) -> Result<Self> {
        let token = token_override
            .filter(|token| !token.trim().is_empty())
            .unwrap_or(file.token);
        if token.trim().is_empty() || token == PLACEHOLDER_TOKEN {
            return Err(Error::Config {
                message: format!(
                    "token is not set; fill it in the config file or set {TOKEN_ENV}"
                ),
            });
        }

        Ok(Self {
            token,
            guild_id: parse_snowflake("guild_id", &file.guild_id)?,
            manager_role_id: parse_snowflake("manager_role_id", &file.manager_role_id)?,
            listings_path: PathBuf::from(
                file.listings_path
                    .unwrap_or_else(|| DEFAULT_LISTINGS_PATH.to_string()),
            ),
        })
    }
}

fn parse_snowflake(field: &str, value: &str) -> Result<u64> {
    let value = value.trim();
    if value == PLACEHOLDER_ID {
        return Err(Error::Config {
            message: format!("{field} still holds the placeholder value"),
        });
    }
    value
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| Error::Config {
            message: format!("{field} must be a Discord id, got {value:?}"),
        })
}

/// Config file location: `DOWNLOAD_DESK_CONFIG`, or `config.toml` in the working directory.
#[must_use]
pub fn config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Reads the config file at `path`, writing a placeholder file if there is none.
///
/// # Errors
/// Returns [`Error::ConfigCreated`] after writing a placeholder file, and
/// [`Error::Config`] if the file cannot be read or parsed.
pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<ConfigFile> {
    let path_ref = path.as_ref();

    if !path_ref.exists() {
        let contents = toml::to_string_pretty(&ConfigFile::placeholder()).map_err(|e| {
            Error::Config {
                message: format!("Failed to serialize placeholder config: {e}"),
            }
        })?;
        std::fs::write(path_ref, contents)?;
        warn!("Config file created at {:?}. Please fill in the details.", path_ref);
        return Err(Error::ConfigCreated {
            path: path_ref.display().to_string(),
        });
    }

    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse TOML from config file {path_ref:?}: {e}"),
    })
}

/// Loads and validates the application configuration.
///
/// `DISCORD_BOT_TOKEN`, when set, takes precedence over the file's token.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = config_path();
    let file = load_or_create(&path)?;
    let config = AppConfig::from_file(file, std::env::var(TOKEN_ENV).ok())?;
    info!(
        "Configuration loaded from {:?} (guild {}, manager role {})",
        path, config.guild_id, config.manager_role_id
    );
    Ok(config)
}
