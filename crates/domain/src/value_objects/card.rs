//! Card slots and card levels.
//!
//! Every card goes from level 1 to 15. Legendary cards can additionally be
//! reincarnated up to three times, which the game shows as levels 16-18.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// Number of cards in a deck
pub const DECK_SIZE: usize = 5;

/// Lowest level any card can have
pub const MIN_CARD_LEVEL: u8 = 1;

/// Highest level for a card that cannot be reincarnated
pub const MAX_STANDARD_LEVEL: u8 = 15;

/// Highest level for a legendary card (Reincarnated III)
pub const MAX_REINCARNATED_LEVEL: u8 = 18;

/// One of the five deck slots.
///
/// An empty `name` means the slot has not been filled in yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardSlot {
    pub name: String,
    pub level: Option<u8>,
}

impl CardSlot {
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        Self {
            name: name.into(),
            level: Some(level),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /// Both the card and its level are chosen.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && self.level.is_some()
    }
}

/// A selectable level for a card, with the label shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelOption {
    pub value: u8,
    pub label: String,
}

/// Highest level the given card can be set to.
pub fn max_level_for(card: &str, catalog: &Catalog) -> u8 {
    if catalog.is_legendary(card) {
        MAX_REINCARNATED_LEVEL
    } else {
        MAX_STANDARD_LEVEL
    }
}

pub fn is_level_allowed(card: &str, level: u8, catalog: &Catalog) -> bool {
    (MIN_CARD_LEVEL..=max_level_for(card, catalog)).contains(&level)
}

/// Level choices for a card slot holding `card`.
///
/// Reincarnated levels only show up for legendary cards, so this has to be
/// recomputed whenever the card name in a slot changes.
pub fn level_options(card: &str, catalog: &Catalog) -> Vec<LevelOption> {
    (MIN_CARD_LEVEL..=max_level_for(card, catalog))
        .map(|value| LevelOption {
            value,
            label: level_label(value),
        })
        .collect()
}

/// Display label for a level ("Level 7", "Reincarnated II (17)").
pub fn level_label(level: u8) -> String {
    match level {
        16 => "Reincarnated I (16)".to_string(),
        17 => "Reincarnated II (17)".to_string(),
        18 => "Reincarnated III (18)".to_string(),
        n => format!("Level {}", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legendary_cards_get_reincarnated_levels() {
        let catalog = Catalog::default();
        let options = level_options("Phoenix", &catalog);
        assert_eq!(options.len(), 18);
        assert_eq!(options[15].label, "Reincarnated I (16)");
        assert_eq!(options[17].label, "Reincarnated III (18)");
    }

    #[test]
    fn common_cards_stop_at_fifteen() {
        let catalog = Catalog::default();
        let options = level_options("Archer", &catalog);
        assert_eq!(options.len(), 15);
        assert_eq!(options.last().map(|o| o.value), Some(15));
        assert!(options.iter().all(|o| o.label.starts_with("Level ")));
    }

    #[test]
    fn empty_slot_offers_standard_levels() {
        let catalog = Catalog::default();
        assert_eq!(level_options("", &catalog).len(), 15);
    }

    #[test]
    fn level_limits() {
        let catalog = Catalog::default();
        assert!(is_level_allowed("Valkerie", 18, &catalog));
        assert!(!is_level_allowed("Valkerie", 19, &catalog));
        assert!(is_level_allowed("Archer", 15, &catalog));
        assert!(!is_level_allowed("Archer", 16, &catalog));
        assert!(!is_level_allowed("Archer", 0, &catalog));
    }

    #[test]
    fn slot_completeness() {
        assert!(CardSlot::default().is_empty());
        assert!(!CardSlot::default().is_complete());
        assert!(CardSlot::new("Twins", 12).is_complete());
        let named_only = CardSlot {
            name: "Twins".to_string(),
            level: None,
        };
        assert!(!named_only.is_empty());
        assert!(!named_only.is_complete());
    }
}
