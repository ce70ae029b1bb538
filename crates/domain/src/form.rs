//! Registration form session.
//!
//! Owns the build being edited and its current strength result. Every setter
//! that touches a scoring input recomputes the result before returning, so
//! the host never sees a stale score; hosts that edit the build directly go
//! through [`RegistrationForm::update`] or call [`RegistrationForm::recompute`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::build::PlayerBuild;
use crate::catalog::Catalog;
use crate::error::DomainError;
use crate::export_code::{self, ExportCodeError};
use crate::strength::{StrengthCalculator, StrengthResult};
use crate::submission::{RegistrationContext, Submission, SubmissionError};
use crate::value_objects::{
    is_level_allowed, level_options, parse_stat, Community, DiscordId, LevelOption,
    SanitizedId, DECK_SIZE,
};

/// A card in the card picker of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardOption {
    pub name: String,
    pub legendary: bool,
    /// Already equipped in another slot
    pub disabled: bool,
}

/// One player's registration form.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    catalog: Arc<Catalog>,
    context: RegistrationContext,
    build: PlayerBuild,
    strength: Option<StrengthResult>,
}

impl RegistrationForm {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            context: RegistrationContext::default(),
            build: PlayerBuild::default(),
            strength: None,
        }
    }

    /// Start a form from the values carried by the registration link.
    pub fn with_context(catalog: Arc<Catalog>, context: RegistrationContext) -> Self {
        Self {
            context,
            ..Self::new(catalog)
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn context(&self) -> &RegistrationContext {
        &self.context
    }

    pub fn build(&self) -> &PlayerBuild {
        &self.build
    }

    /// Current strength, `None` while required stats are missing.
    pub fn strength(&self) -> Option<&StrengthResult> {
        self.strength.as_ref()
    }

    /// Recompute the strength result from scratch.
    pub fn recompute(&mut self) -> Option<&StrengthResult> {
        self.strength = StrengthCalculator::new(&self.catalog).calculate(&self.build);
        self.strength.as_ref()
    }

    /// Edit free-form fields of the build, then recompute.
    pub fn update(&mut self, edit: impl FnOnce(&mut PlayerBuild)) -> Option<&StrengthResult> {
        edit(&mut self.build);
        self.recompute()
    }

    /// Store a typed Discord ID, keeping digits only.
    ///
    /// The returned value tells the caller whether characters were dropped
    /// so it can warn the player.
    pub fn set_discord_id(&mut self, raw: &str) -> SanitizedId {
        let sanitized = DiscordId::sanitize(raw);
        self.context.discord_id = sanitized.digits.clone();
        sanitized
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.context.username = username.into();
    }

    pub fn set_crit_level(&mut self, raw: &str) -> Option<&StrengthResult> {
        self.build.crit_level = parse_stat(raw);
        self.recompute()
    }

    pub fn set_legendarity(&mut self, raw: &str) -> Option<&StrengthResult> {
        self.build.legendarity = parse_stat(raw);
        self.recompute()
    }

    pub fn set_perks_level(&mut self, raw: &str) -> Option<&StrengthResult> {
        self.build.perks_level = parse_stat(raw);
        self.recompute()
    }

    /// Put a card into a slot (an empty name clears the slot).
    ///
    /// A level the new card cannot have is cleared, e.g. Reincarnated II
    /// after switching from a legendary to a common card.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SlotOutOfRange` for a bad slot,
    /// `DomainError::Unknown` for a card not in the catalog and
    /// `DomainError::Constraint` if the card is already in another slot.
    pub fn set_card_name(&mut self, slot: usize, name: &str) -> Result<(), DomainError> {
        check_slot(slot)?;
        let name = name.trim();
        if !name.is_empty() {
            if !self.catalog.is_known_card(name) {
                return Err(DomainError::unknown("card", name));
            }
            if self.build.slot_of(name, Some(slot)).is_some() {
                return Err(DomainError::constraint(format!(
                    "{} is already in your deck",
                    name
                )));
            }
        }

        let card = &mut self.build.cards[slot];
        card.name = name.to_string();
        if let Some(level) = card.level {
            if name.is_empty() || !is_level_allowed(name, level, &self.catalog) {
                card.level = None;
            }
        }
        self.recompute();
        Ok(())
    }

    /// Set the level of a slot, or clear it with `None`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the card in the slot cannot have
    /// that level.
    pub fn set_card_level(&mut self, slot: usize, level: Option<u8>) -> Result<(), DomainError> {
        check_slot(slot)?;
        if let Some(level) = level {
            let name = self.build.cards[slot].name.as_str();
            if !is_level_allowed(name, level, &self.catalog) {
                return Err(DomainError::validation(format!(
                    "Level {} is not available for {}",
                    level,
                    if name.is_empty() { "an empty slot" } else { name }
                )));
            }
        }
        self.build.cards[slot].level = level;
        self.recompute();
        Ok(())
    }

    /// Level choices for a slot, based on the card currently in it.
    pub fn level_options(&self, slot: usize) -> Result<Vec<LevelOption>, DomainError> {
        check_slot(slot)?;
        Ok(level_options(&self.build.cards[slot].name, &self.catalog))
    }

    /// Card choices for a slot; cards equipped elsewhere are disabled.
    pub fn card_options(&self, slot: usize) -> Result<Vec<CardOption>, DomainError> {
        check_slot(slot)?;
        Ok(self
            .catalog
            .all_cards()
            .into_iter()
            .map(|name| CardOption {
                name: name.to_string(),
                legendary: self.catalog.is_legendary(name),
                disabled: self.build.slot_of(name, Some(slot)).is_some(),
            })
            .collect())
    }

    /// Pick a hero; the hero's signature item is selected along with it.
    pub fn select_hero(&mut self, hero: impl Into<String>) {
        self.build.hero = hero.into();
        if let Some(item) = self.catalog.default_item_for(&self.build.hero) {
            self.build.hero_item = Some(item.to_string());
        }
    }

    /// Pick one of the catalog communities.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unknown` if the community is not in the catalog.
    pub fn select_community(&mut self, name: &str) -> Result<(), DomainError> {
        if !self.catalog.is_listed_community(name) {
            return Err(DomainError::unknown("community", name));
        }
        self.build.community = Some(Community::Listed(name.to_string()));
        Ok(())
    }

    /// Use a typed-in community. Length is checked on submit.
    pub fn set_custom_community(&mut self, name: &str) {
        self.build.community = Some(Community::custom(name));
    }

    /// Replace the build with one decoded from an export code.
    ///
    /// On error the form is left exactly as it was.
    pub fn import_code(&mut self, code: &str) -> Result<Option<&StrengthResult>, ExportCodeError> {
        let build = export_code::decode(code, &self.catalog)?;
        self.build = build;
        Ok(self.recompute())
    }

    pub fn export_code(&self) -> String {
        export_code::encode(&self.build)
    }

    /// Reset for another registration. The Discord identity and server stay.
    pub fn clear(&mut self) {
        self.build = PlayerBuild::default();
        self.strength = None;
    }

    /// Run the submission checks and produce the payload for the sink.
    pub fn prepare_submission(&self) -> Result<Submission, SubmissionError> {
        Submission::prepare(self.context.clone(), self.build.clone(), &self.catalog)
    }
}

fn check_slot(slot: usize) -> Result<(), DomainError> {
    if slot >= DECK_SIZE {
        return Err(DomainError::SlotOutOfRange(slot));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::CardSlot;

    fn form() -> RegistrationForm {
        RegistrationForm::with_context(
            Arc::new(Catalog::default()),
            RegistrationContext {
                discord_id: "123456789012345678".to_string(),
                username: "royal".to_string(),
                guild_id: Some("998877665544332211".to_string()),
            },
        )
    }

    fn fill(form: &mut RegistrationForm) {
        form.set_crit_level("50");
        form.set_legendarity("30");
        form.set_perks_level("20");
        form.select_community("Ronin Gaming").unwrap();
        form.select_hero("Zeus (Legendary)");
        for (slot, (name, level)) in [
            ("Archer", 10),
            ("Hunter", 10),
            ("Bard", 10),
            ("Rogue", 10),
            ("Thrower", 10),
        ]
        .into_iter()
        .enumerate()
        {
            form.set_card_name(slot, name).unwrap();
            form.set_card_level(slot, Some(level)).unwrap();
        }
    }

    #[test]
    fn strength_appears_once_stats_are_entered() {
        let mut f = form();
        assert!(f.set_crit_level("50").is_none());
        assert!(f.set_legendarity("30").is_none());
        let result = f.set_perks_level("20").cloned().unwrap();
        assert_eq!(result.total_strength, 36);
        assert_eq!(result.division.as_deref(), Some("Lightweight"));
    }

    #[test]
    fn clearing_a_stat_drops_the_result() {
        let mut f = form();
        fill(&mut f);
        assert!(f.strength().is_some());
        assert!(f.set_crit_level("").is_none());
        assert!(f.strength().is_none());
    }

    #[test]
    fn pantheon_card_changes_score() {
        let mut f = form();
        fill(&mut f);
        f.set_card_name(1, "Phoenix").unwrap();
        let result = f.strength().unwrap();
        assert_eq!(result.adjusted_crit, 60);
        assert_eq!(result.total_strength, 40);
    }

    #[test]
    fn duplicate_card_is_refused() {
        let mut f = form();
        fill(&mut f);
        let err = f.set_card_name(3, "Archer").unwrap_err();
        assert!(matches!(err, DomainError::Constraint(_)));
        assert_eq!(f.build().cards[3].name, "Rogue");
    }

    #[test]
    fn equipped_cards_are_disabled_elsewhere() {
        let mut f = form();
        fill(&mut f);
        let options = f.card_options(0).unwrap();
        let archer = options.iter().find(|o| o.name == "Archer").unwrap();
        let hunter = options.iter().find(|o| o.name == "Hunter").unwrap();
        let phoenix = options.iter().find(|o| o.name == "Phoenix").unwrap();
        assert!(!archer.disabled);
        assert!(hunter.disabled);
        assert!(!phoenix.disabled);
        assert!(phoenix.legendary);
    }

    #[test]
    fn reincarnated_levels_follow_the_card() {
        let mut f = form();
        f.set_card_name(0, "Valkerie").unwrap();
        assert_eq!(f.level_options(0).unwrap().len(), 18);
        f.set_card_level(0, Some(17)).unwrap();

        f.set_card_name(0, "Archer").unwrap();
        assert_eq!(f.level_options(0).unwrap().len(), 15);
        assert_eq!(f.build().cards[0].level, None);
        assert!(f.set_card_level(0, Some(16)).is_err());
        assert!(f.set_card_level(0, Some(15)).is_ok());
    }

    #[test]
    fn bad_slot_is_an_error() {
        let mut f = form();
        assert_eq!(
            f.set_card_name(5, "Archer").unwrap_err(),
            DomainError::SlotOutOfRange(5)
        );
        assert!(f.level_options(9).is_err());
    }

    #[test]
    fn hero_selection_fills_item() {
        let mut f = form();
        f.select_hero("Mari (Epic)");
        assert_eq!(f.build().hero_item.as_deref(), Some("Unstable Jelly"));
    }

    #[test]
    fn discord_id_is_sanitized() {
        let mut f = form();
        let clean = f.set_discord_id("12345abc678901234567");
        assert!(clean.stripped);
        assert_eq!(f.context().discord_id, "12345678901234567");
    }

    #[test]
    fn import_success_replaces_build() {
        let mut source = form();
        fill(&mut source);
        source.set_card_level(0, Some(12)).unwrap();
        let code = source.export_code();

        let mut target = form();
        let result = target.import_code(&code).unwrap().cloned();
        assert_eq!(target.build(), source.build());
        assert_eq!(result.as_ref(), source.strength());
    }

    #[test]
    fn failed_import_leaves_state_untouched() {
        let mut f = form();
        fill(&mut f);
        let before_build = f.build().clone();
        let before_strength = f.strength().cloned();

        let err = f.import_code("only,a,few,fields").unwrap_err();
        assert!(matches!(err, ExportCodeError::InvalidFormat { found: 4, .. }));
        assert_eq!(f.build(), &before_build);
        assert_eq!(f.strength().cloned(), before_strength);
    }

    #[test]
    fn clear_keeps_identity() {
        let mut f = form();
        fill(&mut f);
        f.clear();
        assert_eq!(f.build(), &PlayerBuild::default());
        assert!(f.strength().is_none());
        assert_eq!(f.context().discord_id, "123456789012345678");
        assert!(f.context().guild_id.is_some());
    }

    #[test]
    fn prepare_submission_from_form() {
        let mut f = form();
        fill(&mut f);
        let submission = f.prepare_submission().unwrap();
        assert_eq!(submission.strength.total_strength, 36);
        assert_eq!(submission.export_code, f.export_code());
    }

    #[test]
    fn custom_community_too_short_blocks_submission() {
        let mut f = form();
        fill(&mut f);
        f.set_custom_community(" A ");
        assert!(matches!(
            f.prepare_submission().unwrap_err(),
            SubmissionError::InvalidCommunity(_)
        ));
    }

    #[test]
    fn update_recomputes() {
        let mut f = form();
        fill(&mut f);
        let result = f
            .update(|build| build.cards[0] = CardSlot::new("Valkerie", 18))
            .cloned()
            .unwrap();
        assert_eq!(result.adjusted_crit, 70);
    }
}
