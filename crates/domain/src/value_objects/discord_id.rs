//! Discord user IDs (snowflakes).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Shortest snowflake Discord hands out for user accounts
pub const MIN_DISCORD_ID_LEN: usize = 17;

/// Longest snowflake accepted
pub const MAX_DISCORD_ID_LEN: usize = 20;

/// A validated Discord user ID (17-20 ASCII digits)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiscordId(String);

/// Result of cleaning up a Discord ID typed into a text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedId {
    /// The digits that were kept
    pub digits: String,
    /// Non-digit characters were removed
    pub stripped: bool,
    /// Input was cut down to the maximum length
    pub truncated: bool,
}

impl DiscordId {
    /// Parse a Discord ID.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidId` if the value contains anything but
    /// digits or is not 17-20 digits long.
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("Discord ID cannot be empty"));
        }
        if !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::invalid_id(
                "Discord ID can only contain numbers",
            ));
        }
        if trimmed.len() < MIN_DISCORD_ID_LEN {
            return Err(DomainError::invalid_id(format!(
                "Discord ID must be at least {} digits",
                MIN_DISCORD_ID_LEN
            )));
        }
        if trimmed.len() > MAX_DISCORD_ID_LEN {
            return Err(DomainError::invalid_id(format!(
                "Discord ID is too long (max {} digits)",
                MAX_DISCORD_ID_LEN
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Keep only the digits of `raw`, capped at the maximum length.
    pub fn sanitize(raw: &str) -> SanitizedId {
        let all_digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        let stripped = all_digits.len() != raw.len();
        let truncated = all_digits.len() > MAX_DISCORD_ID_LEN;
        let digits = all_digits.chars().take(MAX_DISCORD_ID_LEN).collect();
        SanitizedId {
            digits,
            stripped,
            truncated,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiscordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for DiscordId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<DiscordId> for String {
    fn from(id: DiscordId) -> String {
        id.0
    }
}
