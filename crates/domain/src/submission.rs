//! Registration submissions - the payload handed to a submission sink.
//!
//! The same checks run in the form before submitting and again on the
//! server, where the strength and export code are recomputed from the build
//! instead of trusting what the client sent.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::build::PlayerBuild;
use crate::catalog::Catalog;
use crate::export_code;
use crate::strength::{StrengthCalculator, StrengthResult};
use crate::value_objects::{is_level_allowed, DiscordId};

/// Who is registering and from which server, taken from the registration link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationContext {
    pub discord_id: String,
    pub username: String,
    pub guild_id: Option<String>,
}

/// A validated registration ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(flatten)]
    pub context: RegistrationContext,
    #[serde(flatten)]
    pub build: PlayerBuild,
    pub strength: StrengthResult,
    pub export_code: String,
}

/// What a client posts to register: who is registering and their build.
///
/// Strength and export code are always derived here, so a client may leave
/// them out; any sent along are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    #[serde(flatten)]
    pub context: RegistrationContext,
    #[serde(flatten)]
    pub build: PlayerBuild,
}

impl RegistrationRequest {
    /// Run the submission checks and build the trusted payload.
    ///
    /// # Errors
    ///
    /// Returns the first failed check, see [`Submission::prepare`].
    pub fn validate(self, catalog: &Catalog) -> Result<Submission, SubmissionError> {
        Submission::prepare(self.context, self.build, catalog)
    }
}

impl From<Submission> for RegistrationRequest {
    fn from(submission: Submission) -> Self {
        Self {
            context: submission.context,
            build: submission.build,
        }
    }
}

/// Reasons a registration cannot be submitted. All are fixable by the player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Please use the registration link from Discord so your server can be identified")]
    MissingGuild,

    #[error("Invalid Discord ID: {0}")]
    InvalidDiscordId(String),

    #[error("Please enter a valid community name: {0}")]
    InvalidCommunity(String),

    #[error("Please select or enter your community")]
    MissingCommunity,

    #[error("Please complete all 5 cards in your deck (card {slot} is incomplete)")]
    IncompleteDeck { slot: usize },

    #[error("{0} is already in your deck")]
    DuplicateCard(String),

    #[error("Unknown card: {0}")]
    UnknownCard(String),

    #[error("{card} cannot be level {level}")]
    InvalidCardLevel { card: String, level: u8 },

    #[error("Strength cannot be calculated - check crit, legendarity and perks")]
    StrengthUnavailable,

    #[error("Invalid stats! Total strength {0} is outside every division")]
    UnclassifiedStrength(u64),
}

impl Submission {
    /// Check a registration and build the submission payload.
    ///
    /// # Errors
    ///
    /// Returns the first failed check, in the order the form reports them:
    /// server link, Discord ID, community, deck, strength.
    pub fn prepare(
        context: RegistrationContext,
        build: PlayerBuild,
        catalog: &Catalog,
    ) -> Result<Self, SubmissionError> {
        let strength = check_registration(&context, &build, catalog)?;
        let export_code = export_code::encode(&build);
        Ok(Self {
            context,
            build,
            strength,
            export_code,
        })
    }
}

/// Re-validate a submission received from a client.
///
/// The strength result and export code are rebuilt from the build, so a
/// tampered score or code never reaches the sink.
pub fn validate_submission(
    submission: Submission,
    catalog: &Catalog,
) -> Result<Submission, SubmissionError> {
    RegistrationRequest::from(submission).validate(catalog)
}

/// Run every submission check and return the classified strength.
pub fn check_registration(
    context: &RegistrationContext,
    build: &PlayerBuild,
    catalog: &Catalog,
) -> Result<StrengthResult, SubmissionError> {
    let has_guild = context
        .guild_id
        .as_deref()
        .is_some_and(|g| !g.trim().is_empty());
    if !has_guild {
        return Err(SubmissionError::MissingGuild);
    }

    DiscordId::parse(context.discord_id.as_str())
        .map_err(|e| SubmissionError::InvalidDiscordId(e.to_string()))?;

    match &build.community {
        None => return Err(SubmissionError::MissingCommunity),
        Some(community) => community
            .validate(catalog)
            .map_err(|e| SubmissionError::InvalidCommunity(e.to_string()))?,
    }

    if let Some(slot) = build.missing_card_slot() {
        return Err(SubmissionError::IncompleteDeck { slot: slot + 1 });
    }
    if let Some(card) = build.duplicate_card() {
        return Err(SubmissionError::DuplicateCard(card.to_string()));
    }
    for slot in &build.cards {
        if !catalog.is_known_card(&slot.name) {
            return Err(SubmissionError::UnknownCard(slot.name.clone()));
        }
        if let Some(level) = slot.level {
            if !is_level_allowed(&slot.name, level, catalog) {
                return Err(SubmissionError::InvalidCardLevel {
                    card: slot.name.clone(),
                    level,
                });
            }
        }
    }

    let strength = StrengthCalculator::new(catalog)
        .calculate(build)
        .ok_or(SubmissionError::StrengthUnavailable)?;
    if !strength.is_classified() {
        return Err(SubmissionError::UnclassifiedStrength(strength.total_strength));
    }

    Ok(strength)
}
