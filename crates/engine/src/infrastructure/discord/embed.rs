//! Discord embeds describing a registration.

use chrono::{DateTime, SecondsFormat, Utc};
use rushroyale_domain::{CardSlot, StrengthResult, Submission, NO_HERO_ITEM};
use serde::{Deserialize, Serialize};

/// Orange, "waiting for a moderator"
pub const PENDING_COLOR: u32 = 0xFFA500;

/// Discord blurple, used for messages to the player
pub const PLAYER_COLOR: u32 = 0x5865F2;

pub const PENDING_TITLE: &str = "🌐 Browser Registration - PENDING APPROVAL";

/// Discord refuses fields with an empty value.
const EMPTY_VALUE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: u32,
    #[serde(default)]
    pub fields: Vec<EmbedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn inline(name: &str, value: impl Into<String>) -> Self {
        Self::new(name, value, true)
    }

    fn block(name: &str, value: impl Into<String>) -> Self {
        Self::new(name, value, false)
    }

    fn new(name: &str, value: impl Into<String>, inline: bool) -> Self {
        let value = value.into();
        Self {
            name: name.to_string(),
            value: if value.trim().is_empty() {
                EMPTY_VALUE.to_string()
            } else {
                value
            },
            inline,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// The moderator-facing summary of a registration.
pub fn registration_embed(submission: &Submission, now: DateTime<Utc>) -> Embed {
    let context = &submission.context;
    let build = &submission.build;

    let hero = match build.hero_level {
        Some(level) if !build.hero.is_empty() => format!("{} (Lv {})", build.hero, level),
        _ => build.hero.clone(),
    };

    let mut fields = vec![
        EmbedField::inline("👤 Discord User", mention(&context.discord_id)),
        EmbedField::inline("📝 Username", context.username.as_str()),
        EmbedField::inline("🎮 Game Username", build.game_username.as_str()),
        EmbedField::inline("🆔 Game ID", build.game_id.as_str()),
        EmbedField::inline(
            "🏛️ Community",
            build.community.as_ref().map(|c| c.as_str()).unwrap_or_default(),
        ),
        EmbedField::inline("🕐 Timezone", build.timezone.as_str()),
        EmbedField::inline("🦸 Hero", hero),
        EmbedField::inline(
            "🎯 Perks Level",
            build.perks_level.map(|p| p.to_string()).unwrap_or_default(),
        ),
    ];

    if let Some(item) = build
        .hero_item
        .as_deref()
        .filter(|i| !i.is_empty() && *i != NO_HERO_ITEM)
    {
        fields.push(EmbedField::inline(
            "⭐ Hero Item",
            format!("{} (Lv {})", item, build.hero_item_level.unwrap_or(0)),
        ));
    }

    fields.push(EmbedField::block("🃏 Deck (5 Cards)", deck_text(&build.cards)));
    fields.push(EmbedField::block(
        "📊 Calculated Strength",
        strength_text(&submission.strength),
    ));
    fields.push(EmbedField::block(
        "📋 Export Code",
        format!("```{}```", submission.export_code),
    ));

    Embed {
        title: PENDING_TITLE.to_string(),
        description: Some("Please review the participant information below:".to_string()),
        color: PENDING_COLOR,
        fields,
        timestamp: Some(iso_timestamp(now)),
        footer: Some(EmbedFooter {
            text: format!(
                "User ID: {} | Source: Browser | Status: Pending",
                context.discord_id
            ),
        }),
    }
}

/// Direct message sent to the player with their export code.
pub fn export_code_embed(export_code: &str) -> Embed {
    Embed {
        title: "✅ Registration Submitted!".to_string(),
        description: Some(
            "Your registration has been submitted and is pending approval.".to_string(),
        ),
        color: PLAYER_COLOR,
        fields: vec![EmbedField::block(
            "📋 Your Export Code",
            format!("Keep this safe in case you need it:\n```{}```", export_code),
        )],
        timestamp: None,
        footer: Some(EmbedFooter {
            text: "You'll be notified once your registration is approved!".to_string(),
        }),
    }
}

pub fn mention(discord_id: &str) -> String {
    format!("<@{}>", discord_id)
}

/// One "N. Card - Lv L" line per slot.
pub fn deck_text(cards: &[CardSlot]) -> String {
    cards
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let level = slot
                .level
                .map(|l| l.to_string())
                .unwrap_or_else(|| "?".to_string());
            format!("{}. {} - Lv {}", i + 1, slot.name, level)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn strength_text(strength: &StrengthResult) -> String {
    let mut lines = vec![
        format!("Base Crit: {}%", strength.base_crit),
        format!("Adjusted Crit: {}%", strength.adjusted_crit),
    ];
    if !strength.pantheon_cards.is_empty() {
        let bonuses = strength
            .pantheon_cards
            .iter()
            .map(|card| format!("{}: +{}%", card.name, card.percent))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Pantheon Bonuses: {}", bonuses));
    }
    lines.push(format!("Legendarity: {}", strength.legendarity));
    lines.push(format!("Perks: {}", strength.perks));
    lines.push(format!("Total Strength: {}", strength.total_strength));
    lines.push(format!(
        "Division: {}",
        strength.division.as_deref().unwrap_or("Unclassified")
    ));
    lines.join("\n")
}

/// Same shape as JavaScript's `toISOString`.
fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 10, 30, 0).unwrap()
    }

    fn field<'a>(embed: &'a Embed, name: &str) -> Option<&'a EmbedField> {
        embed.fields.iter().find(|f| f.name == name)
    }

    #[test]
    fn pending_embed_header_and_footer() {
        let embed = registration_embed(&test_fixtures::submission(), now());
        assert_eq!(embed.title, "🌐 Browser Registration - PENDING APPROVAL");
        assert_eq!(embed.color, 0xFFA500);
        assert_eq!(embed.timestamp.as_deref(), Some("2025-06-15T10:30:00.000Z"));
        assert_eq!(
            embed.footer.unwrap().text,
            "User ID: 123456789012345678 | Source: Browser | Status: Pending"
        );
    }

    #[test]
    fn pending_embed_fields() {
        let embed = registration_embed(&test_fixtures::submission(), now());
        assert_eq!(
            field(&embed, "👤 Discord User").unwrap().value,
            "<@123456789012345678>"
        );
        assert_eq!(
            field(&embed, "🦸 Hero").unwrap().value,
            "Zeus (Legendary) (Lv 9)"
        );
        assert_eq!(
            field(&embed, "⭐ Hero Item").unwrap().value,
            "Star Gaze (Lv 4)"
        );
        let deck = field(&embed, "🃏 Deck (5 Cards)").unwrap();
        assert!(!deck.inline);
        assert!(deck.value.starts_with("1. Phoenix - Lv 12\n2. Archer - Lv 15"));

        let code = field(&embed, "📋 Export Code").unwrap();
        assert!(code.value.contains("RoyalPlayer,987654,50,30,20"));
    }

    #[test]
    fn no_hero_item_field_without_item() {
        let mut submission = test_fixtures::submission();
        submission.build.hero_item = None;
        let embed = registration_embed(&submission, now());
        assert!(field(&embed, "⭐ Hero Item").is_none());

        submission.build.hero_item = Some(NO_HERO_ITEM.to_string());
        submission.build.hero_item_level = Some(0);
        let embed = registration_embed(&submission, now());
        assert!(field(&embed, "⭐ Hero Item").is_none());
    }

    #[test]
    fn empty_values_become_placeholder() {
        let mut submission = test_fixtures::submission();
        submission.context.username = String::new();
        let embed = registration_embed(&submission, now());
        assert_eq!(field(&embed, "📝 Username").unwrap().value, "N/A");
    }

    #[test]
    fn strength_summary_lists_pantheon_bonuses() {
        let submission = test_fixtures::submission();
        let text = strength_text(&submission.strength);
        assert!(text.contains("Base Crit: 50%"));
        assert!(text.contains("Adjusted Crit: 70%"));
        assert!(text.contains("Pantheon Bonuses: Phoenix: +20%, Twins: +20%"));
        assert!(text.ends_with("Division: Lightweight"));
    }

    #[test]
    fn export_code_dm() {
        let embed = export_code_embed("a,b,c");
        assert_eq!(embed.color, PLAYER_COLOR);
        assert!(embed.fields[0].value.ends_with("```a,b,c```"));
        let json = serde_json::to_value(&embed).unwrap();
        assert!(json.get("timestamp").is_none());
    }
}
