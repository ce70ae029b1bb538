//! Engine configuration from environment variables.

use std::path::{Path, PathBuf};

use rushroyale_domain::{Catalog, DomainError};

use crate::infrastructure::discord::DEFAULT_API_BASE;

pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server port: {0}")]
    InvalidPort(String),

    #[error("Failed to read catalog {path}: {source}")]
    ReadCatalog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog {path}: {source}")]
    ParseCatalog {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(#[from] DomainError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    /// `*` or a comma separated list; `None` disables CORS
    pub cors_allowed_origins: Option<String>,
    pub discord: DiscordConfig,
    /// JSON catalog replacing the built-in one
    pub catalog_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscordConfig {
    pub bot_token: Option<String>,
    /// Review channel used when a guild has no registration category
    pub channel_id: Option<String>,
    pub webhook_url: Option<String>,
    pub api_base: String,
}

/// Where registrations get delivered, picked from what is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Bot {
        token: String,
        fallback_channel_id: Option<String>,
    },
    Webhook { url: String },
    ExportOnly,
}

impl DiscordConfig {
    /// Bot beats webhook; with neither, players register with their export code.
    pub fn delivery(&self) -> Delivery {
        match (&self.bot_token, &self.webhook_url) {
            (Some(token), _) => Delivery::Bot {
                token: token.clone(),
                fallback_channel_id: self.channel_id.clone(),
            },
            (None, Some(url)) => Delivery::Webhook { url: url.clone() },
            (None, None) => Delivery::ExportOnly,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let server_port = match get("SERVER_PORT").or_else(|| get("PORT")) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_SERVER_PORT,
        };

        Ok(Self {
            server_host: get("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port,
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
            discord: DiscordConfig {
                bot_token: get("DISCORD_BOT_TOKEN"),
                channel_id: get("DISCORD_CHANNEL_ID"),
                webhook_url: get("DISCORD_WEBHOOK_URL"),
                api_base: get("DISCORD_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            },
            catalog_path: get("CATALOG_PATH").map(PathBuf::from),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// The configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog_path {
            Some(path) => load_catalog(path),
            None => Ok(Catalog::default()),
        }
    }
}

/// Read and validate a JSON catalog.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadCatalog {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog: Catalog =
        serde_json::from_str(&raw).map_err(|source| ConfigError::ParseCatalog {
            path: path.to_path_buf(),
            source,
        })?;
    catalog.validate()?;
    Ok(catalog)
}
