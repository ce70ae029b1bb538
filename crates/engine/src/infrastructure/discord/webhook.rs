//! Discord webhook sink - posts the registration embed to a webhook URL.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use rushroyale_domain::Submission;
use serde::Serialize;

use super::embed::{mention, registration_embed, Embed};
use super::{http_client, read_json, DiscordMessage};
use crate::infrastructure::ports::{ClockPort, SinkError, SinkReceipt, SubmissionSink};

#[derive(Serialize)]
struct WebhookMessage {
    content: String,
    embeds: Vec<Embed>,
}

pub struct WebhookSink {
    client: Client,
    url: String,
    clock: Arc<dyn ClockPort>,
}

impl WebhookSink {
    pub fn new(url: &str, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            client: http_client(),
            url: url.trim().to_string(),
            clock,
        }
    }

    /// `wait=true` makes Discord answer with the created message.
    fn execute_url(&self) -> String {
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}wait=true", self.url, separator)
    }
}

#[async_trait]
impl SubmissionSink for WebhookSink {
    fn name(&self) -> &'static str {
        "discord-webhook"
    }

    async fn deliver(&self, submission: &Submission) -> Result<SinkReceipt, SinkError> {
        let message = WebhookMessage {
            content: format!(
                "🌐 New browser registration from **{}** ({})",
                submission.build.game_username,
                mention(&submission.context.discord_id)
            ),
            embeds: vec![registration_embed(submission, self.clock.now())],
        };

        let posted: DiscordMessage =
            read_json(self.client.post(self.execute_url()).json(&message).send().await).await?;

        tracing::info!(
            message_id = %posted.id,
            channel_id = %posted.channel_id,
            "Posted registration to Discord webhook"
        );

        Ok(SinkReceipt::new(
            "Registration submitted! A moderator will review it in Discord.",
        )
        .in_channel(posted.channel_id))
    }
}
