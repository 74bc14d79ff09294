//! Unified error types and result handling.

use poise::serenity_prelude as serenity;
use thiserror::Error;

/// Every failure the bot can surface, from startup configuration to Discord calls.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file is unreadable, malformed, or still holds placeholders.
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong with the configuration
        message: String,
    },

    /// A fresh configuration file was written and has to be filled in before starting.
    #[error("Config file created at {path}. Please fill in the details.")]
    ConfigCreated {
        /// Where the placeholder file was written
        path: String,
    },

    /// Reading or writing the listings or config file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The listings file could not be serialized or parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A form or button carried an identifier this bot never issued.
    #[error("Unrecognized custom id: {custom_id}")]
    InvalidCustomId {
        /// The offending identifier
        custom_id: String,
    },

    /// A submitted form could not be read back into its fields.
    #[error("Modal error: {0}")]
    Modal(String),

    /// Serenity/Poise framework error.
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<serenity::Error>),
}

impl From<serenity::Error> for Error {
    fn from(value: serenity::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
