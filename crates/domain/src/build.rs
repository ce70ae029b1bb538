//! Player build - everything a player enters about their account and deck.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::value_objects::{CardSlot, Community, DECK_SIZE};

/// Timezone preselected on a fresh form
pub const DEFAULT_TIMEZONE: &str = "UTC-05:00";

/// A player's stats, hero and five-card deck.
///
/// Numeric fields are `None` until the player enters something parseable.
/// `perks_level` of `Some(0)` is a real value, unlike crit and legendarity
/// where zero counts as not entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerBuild {
    pub game_username: String,
    pub game_id: String,
    pub crit_level: Option<u32>,
    pub legendarity: Option<u32>,
    pub perks_level: Option<u32>,
    pub timezone: String,
    pub community: Option<Community>,
    pub hero: String,
    pub hero_level: Option<u32>,
    pub hero_item: Option<String>,
    pub hero_item_level: Option<u32>,
    pub cards: [CardSlot; DECK_SIZE],
}

impl Default for PlayerBuild {
    fn default() -> Self {
        Self {
            game_username: String::new(),
            game_id: String::new(),
            crit_level: None,
            legendarity: None,
            perks_level: None,
            timezone: DEFAULT_TIMEZONE.to_string(),
            community: None,
            hero: String::new(),
            hero_level: None,
            hero_item: None,
            hero_item_level: None,
            cards: Default::default(),
        }
    }
}

impl PlayerBuild {
    /// Index of the first slot without both a card and a level.
    pub fn missing_card_slot(&self) -> Option<usize> {
        self.cards.iter().position(|slot| !slot.is_complete())
    }

    /// First card name that is equipped in more than one slot.
    pub fn duplicate_card(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.cards
            .iter()
            .filter(|slot| !slot.is_empty())
            .map(|slot| slot.name.as_str())
            .find(|name| !seen.insert(*name))
    }

    /// Slot holding `card`, ignoring `except`.
    pub fn slot_of(&self, card: &str, except: Option<usize>) -> Option<usize> {
        self.cards
            .iter()
            .enumerate()
            .find(|(i, slot)| Some(*i) != except && !slot.is_empty() && slot.name == card)
            .map(|(i, _)| i)
    }
}
