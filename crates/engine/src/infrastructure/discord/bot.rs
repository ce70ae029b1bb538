//! Discord bot sink.
//!
//! Opens a private ticket channel for the player under the guild's
//! registration category, posts the registration there with Approve/Deny
//! buttons and a division override menu, pings the reviewers, then DMs the
//! player their export code. The DM is best-effort: players with DMs closed
//! still get registered, and are told to keep their export code instead.
//!
//! A guild without a registration category falls back to the configured
//! review channel. With no review channel either, the registration is
//! declined and the player finishes with the export code.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use rushroyale_domain::Submission;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::embed::{export_code_embed, mention, registration_embed};
use super::{http_client, read_json, DiscordChannel, DiscordMessage, DiscordRole};
use crate::infrastructure::ports::{ClockPort, SinkError, SinkReceipt, SubmissionSink};

pub const APPROVE_BUTTON_ID: &str = "approve_browser_reg";
pub const DENY_BUTTON_ID: &str = "reject_browser_reg";
pub const DIVISION_OVERRIDE_ID: &str = "division_override_browser";
pub const EXPORT_SETTINGS_BUTTON_ID: &str = "export_settings_persistent";

/// Preferred name of the category tickets are opened under.
pub const REGISTRATION_CATEGORY: &str = "REGISTRATIONS";

/// Roles that can see every ticket and get pinged, in ping order.
pub const REVIEWER_ROLES: [&str; 2] = ["Moderator", "Administrator"];

/// Discord caps a select menu at 25 options, one is "keep current".
const MAX_DIVISION_OPTIONS: usize = 24;

const TEXT_CHANNEL: u8 = 0;
const ROLE_OVERWRITE: u8 = 0;
const MEMBER_OVERWRITE: u8 = 1;
/// VIEW_CHANNEL
const VIEW_CHANNEL: &str = "1024";
/// VIEW_CHANNEL | SEND_MESSAGES
const VIEW_AND_SEND: &str = "3072";

/// Where the review message goes.
struct ReviewChannel {
    id: String,
    /// Roles to ping; empty outside ticket channels
    reviewers: Vec<DiscordRole>,
    ticket: bool,
}

pub struct BotChannelSink {
    client: Client,
    api_base: String,
    token: String,
    fallback_channel_id: Option<String>,
    division_names: Vec<String>,
    clock: Arc<dyn ClockPort>,
}

impl BotChannelSink {
    pub fn new(
        api_base: &str,
        token: &str,
        fallback_channel_id: Option<&str>,
        division_names: Vec<String>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            client: http_client(),
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.trim().to_string(),
            fallback_channel_id: fallback_channel_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            division_names,
            clock,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, SinkError> {
        read_json(
            self.client
                .get(format!("{}{}", self.api_base, path))
                .header(AUTHORIZATION, self.authorization())
                .send()
                .await,
        )
        .await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, SinkError> {
        read_json(
            self.client
                .post(format!("{}{}", self.api_base, path))
                .header(AUTHORIZATION, self.authorization())
                .json(body)
                .send()
                .await,
        )
        .await
    }

    async fn post_message(&self, channel_id: &str, body: &Value) -> Result<DiscordMessage, SinkError> {
        self.post(&format!("/channels/{}/messages", channel_id), body)
            .await
    }

    /// Ticket channel in the guild, or the fallback review channel.
    async fn review_channel(&self, submission: &Submission) -> Result<Option<ReviewChannel>, SinkError> {
        if let Some(guild_id) = submission.context.guild_id.as_deref() {
            if let Some(ticket) = self.open_ticket(guild_id, submission).await? {
                return Ok(Some(ticket));
            }
        }

        Ok(self.fallback_channel_id.clone().map(|id| ReviewChannel {
            id,
            reviewers: Vec::new(),
            ticket: false,
        }))
    }

    /// Creates `web-<game username>` under the registration category.
    /// `None` when the guild has no such category.
    async fn open_ticket(
        &self,
        guild_id: &str,
        submission: &Submission,
    ) -> Result<Option<ReviewChannel>, SinkError> {
        let channels: Vec<DiscordChannel> =
            self.get(&format!("/guilds/{}/channels", guild_id)).await?;
        let Some(category) = find_registration_category(&channels) else {
            tracing::warn!(guild_id = %guild_id, "No registration category found");
            return Ok(None);
        };

        let reviewers = self.reviewer_roles(guild_id).await;
        let body = json!({
            "name": ticket_channel_name(&submission.build.game_username),
            "type": TEXT_CHANNEL,
            "parent_id": category.id,
            "permission_overwrites": permission_overwrites(
                guild_id,
                &submission.context.discord_id,
                &reviewers,
            ),
        });
        let ticket: DiscordChannel = self
            .post(&format!("/guilds/{}/channels", guild_id), &body)
            .await?;
        tracing::info!(
            channel_id = %ticket.id,
            channel = %ticket.name,
            category = %category.name,
            "Opened ticket channel"
        );

        Ok(Some(ReviewChannel {
            id: ticket.id,
            reviewers,
            ticket: true,
        }))
    }

    /// Reviewer roles present in the guild. A failed lookup only loses the pings.
    async fn reviewer_roles(&self, guild_id: &str) -> Vec<DiscordRole> {
        match self
            .get::<Vec<DiscordRole>>(&format!("/guilds/{}/roles", guild_id))
            .await
        {
            Ok(roles) => pick_reviewers(roles),
            Err(e) => {
                tracing::warn!(error = %e, guild_id = %guild_id, "Could not fetch guild roles");
                Vec::new()
            }
        }
    }

    /// "Export My Settings" button and the reviewer ping. Best-effort.
    async fn post_ticket_extras(&self, channel: &ReviewChannel) {
        let messages = [
            export_settings_message(),
            json!({ "content": reviewer_ping(&channel.reviewers) }),
        ];
        for body in &messages {
            if let Err(e) = self.post_message(&channel.id, body).await {
                tracing::warn!(error = %e, channel_id = %channel.id, "Could not post to ticket channel");
            }
        }
    }

    async fn send_export_code_dm(&self, submission: &Submission) -> Result<(), SinkError> {
        let dm: DiscordChannel = self
            .post(
                "/users/@me/channels",
                &json!({ "recipient_id": submission.context.discord_id }),
            )
            .await?;

        let body = json!({ "embeds": [export_code_embed(&submission.export_code)] });
        self.post_message(&dm.id, &body).await?;
        Ok(())
    }

    fn authorization(&self) -> String {
        format!("Bot {}", self.token)
    }
}

/// `REGISTRATIONS`, else the first category whose name mentions
/// registration or pending.
pub fn find_registration_category(channels: &[DiscordChannel]) -> Option<&DiscordChannel> {
    let categories = || channels.iter().filter(|c| c.is_category());
    categories()
        .find(|c| c.name == REGISTRATION_CATEGORY)
        .or_else(|| {
            categories().find(|c| {
                let name = c.name.to_lowercase();
                name.contains("registration") || name.contains("pending")
            })
        })
}

/// `web-<game username>`, lowercased, with anything outside `[a-z0-9-]` as `-`.
pub fn ticket_channel_name(game_username: &str) -> String {
    format!("web-{}", game_username)
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Hidden from @everyone (whose role id is the guild id), open to the player
/// and the reviewer roles.
pub fn permission_overwrites(guild_id: &str, discord_id: &str, reviewers: &[DiscordRole]) -> Value {
    let mut overwrites = vec![
        json!({ "id": guild_id, "type": ROLE_OVERWRITE, "deny": VIEW_CHANNEL }),
        json!({ "id": discord_id, "type": MEMBER_OVERWRITE, "allow": VIEW_AND_SEND }),
    ];
    overwrites.extend(reviewers.iter().map(|role| {
        json!({ "id": role.id, "type": ROLE_OVERWRITE, "allow": VIEW_AND_SEND })
    }));
    Value::Array(overwrites)
}

fn pick_reviewers(roles: Vec<DiscordRole>) -> Vec<DiscordRole> {
    REVIEWER_ROLES
        .iter()
        .filter_map(|name| roles.iter().find(|role| role.name == *name).cloned())
        .collect()
}

pub fn reviewer_ping(reviewers: &[DiscordRole]) -> String {
    let mut ping = String::from("🔔 New browser registration to review!");
    for role in reviewers {
        ping.push_str(&format!(" <@&{}>", role.id));
    }
    ping
}

fn export_settings_message() -> Value {
    json!({
        "content": "📤 **Your Registration Settings:**",
        "components": [{
            "type": 1,
            "components": [{
                "type": 2,
                "style": 1,
                "label": "Export My Settings",
                "custom_id": EXPORT_SETTINGS_BUTTON_ID,
                "emoji": { "name": "📤" }
            }]
        }]
    })
}

/// Approve/Deny buttons and the division override menu.
pub fn review_components(division_names: &[String]) -> Value {
    let mut options = vec![json!({
        "label": "Keep Current Division",
        "value": "none",
        "default": true
    })];
    options.extend(
        division_names
            .iter()
            .take(MAX_DIVISION_OPTIONS)
            .map(|name| json!({ "label": name, "value": name })),
    );

    json!([
        {
            "type": 1,
            "components": [
                { "type": 2, "style": 3, "label": "Approve", "custom_id": APPROVE_BUTTON_ID },
                { "type": 2, "style": 4, "label": "Deny", "custom_id": DENY_BUTTON_ID }
            ]
        },
        {
            "type": 1,
            "components": [
                {
                    "type": 3,
                    "custom_id": DIVISION_OVERRIDE_ID,
                    "placeholder": "Override Division (optional)",
                    "options": options
                }
            ]
        }
    ])
}

#[async_trait]
impl SubmissionSink for BotChannelSink {
    fn name(&self) -> &'static str {
        "discord-bot"
    }

    async fn deliver(&self, submission: &Submission) -> Result<SinkReceipt, SinkError> {
        let Some(channel) = self.review_channel(submission).await? else {
            return Ok(SinkReceipt::declined(
                "Registration category not found. Please contact an administrator.",
            ));
        };

        let body = json!({
            "content": mention(&submission.context.discord_id),
            "embeds": [registration_embed(submission, self.clock.now())],
            "components": review_components(&self.division_names),
        });
        let posted = self.post_message(&channel.id, &body).await?;
        tracing::info!(
            message_id = %posted.id,
            channel_id = %channel.id,
            ticket = channel.ticket,
            "Posted registration for review"
        );

        if channel.ticket {
            self.post_ticket_extras(&channel).await;
        }

        let dm_sent = match self.send_export_code_dm(submission).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    discord_id = %submission.context.discord_id,
                    "Could not DM export code"
                );
                false
            }
        };

        let receipt = match (channel.ticket, dm_sent) {
            (true, true) => SinkReceipt::new(
                "Registration submitted successfully! Check your DMs and your private ticket channel.",
            ),
            (true, false) => SinkReceipt::new(
                "Registration submitted successfully! Check your private ticket channel. We could not DM you, so keep your export code.",
            )
            .with_export_code(),
            (false, true) => SinkReceipt::new(
                "Registration submitted successfully! Check your DMs for your export code.",
            ),
            (false, false) => SinkReceipt::new(
                "Registration submitted successfully! We could not DM you, so keep your export code.",
            )
            .with_export_code(),
        };

        Ok(receipt.in_channel(channel.id))
    }
}
