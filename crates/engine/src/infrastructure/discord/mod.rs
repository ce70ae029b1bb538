//! Discord delivery: embeds plus the webhook and bot sinks.

pub mod bot;
pub mod embed;
pub mod webhook;

pub use bot::BotChannelSink;
pub use webhook::WebhookSink;

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::infrastructure::ports::SinkError;

/// Default Discord REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The parts of a Discord message object we use.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordMessage {
    pub id: String,
    pub channel_id: String,
}

/// Channel type of a guild category.
pub const CATEGORY_CHANNEL: u8 = 4;

/// The parts of a Discord channel object we use.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordChannel {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: u8,
    /// DM channels have no name
    #[serde(default)]
    pub name: String,
}

impl DiscordChannel {
    pub fn is_category(&self) -> bool {
        self.kind == CATEGORY_CHANNEL
    }
}

/// The parts of a Discord role object we use.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordRole {
    pub id: String,
    pub name: String,
}

fn http_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Turn a Discord response into `T`, mapping failures to [`SinkError`].
async fn read_json<T: DeserializeOwned>(
    response: Result<Response, reqwest::Error>,
) -> Result<T, SinkError> {
    let response = response.map_err(SinkError::request)?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SinkError::Rejected {
            status: status.as_u16(),
            body,
        });
    }
    response.json().await.map_err(SinkError::invalid_response)
}
