//! Game catalog - the read-only configuration the registration core runs against.
//!
//! Card names, communities, heroes, pantheon bonuses, scoring weights and the
//! division table all live here. The engine loads one catalog at startup (the
//! built-in default or a JSON override) and shares it behind an `Arc`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::DomainError;
use crate::strength::{DivisionRange, DivisionTable, ScoringWeights};

/// A community offered in the community picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityEntry {
    pub name: String,
    pub emoji: String,
}

/// A hero and the hero item that is auto-selected when the hero is picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroEntry {
    pub name: String,
    pub default_item: String,
}

/// A card that grants a crit bonus while equipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PantheonEntry {
    pub card: String,
    /// Crit bonus as an integer percentage (20 = +20%)
    pub percent: u32,
}

/// Read-only game data injected into the calculator, the codec and the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Cards that may be reincarnated (levels 16-18)
    pub legendary_cards: Vec<String>,
    /// Every other card
    pub common_cards: Vec<String>,
    pub communities: Vec<CommunityEntry>,
    pub heroes: Vec<HeroEntry>,
    pub pantheon_bonuses: Vec<PantheonEntry>,
    pub weights: ScoringWeights,
    pub divisions: DivisionTable,
}

impl Catalog {
    /// Every card name (legendary and common), sorted by name.
    pub fn all_cards(&self) -> Vec<&str> {
        let mut cards: Vec<&str> = self
            .legendary_cards
            .iter()
            .chain(self.common_cards.iter())
            .map(String::as_str)
            .collect();
        cards.sort_unstable();
        cards
    }

    pub fn is_legendary(&self, card: &str) -> bool {
        self.legendary_cards.iter().any(|c| c == card)
    }

    pub fn is_known_card(&self, card: &str) -> bool {
        self.is_legendary(card) || self.common_cards.iter().any(|c| c == card)
    }

    pub fn is_listed_community(&self, name: &str) -> bool {
        self.communities.iter().any(|c| c.name == name)
    }

    /// Pantheon crit bonus for a card, if it has one.
    pub fn pantheon_percent(&self, card: &str) -> Option<u32> {
        self.pantheon_bonuses
            .iter()
            .find(|p| p.card == card)
            .map(|p| p.percent)
    }

    /// Hero item that gets auto-selected for a hero.
    pub fn default_item_for(&self, hero: &str) -> Option<&str> {
        self.heroes
            .iter()
            .find(|h| h.name == hero)
            .map(|h| h.default_item.as_str())
    }

    /// Hero items in catalog order.
    pub fn hero_items(&self) -> Vec<&str> {
        self.heroes.iter().map(|h| h.default_item.as_str()).collect()
    }

    /// Check the internal consistency of a catalog loaded from outside.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a card is listed twice, a
    /// pantheon bonus names a card that does not exist, or a division
    /// range is empty or inverted.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for card in self.legendary_cards.iter().chain(self.common_cards.iter()) {
            if !seen.insert(card.as_str()) {
                return Err(DomainError::validation(format!(
                    "Card '{}' is listed more than once",
                    card
                )));
            }
        }

        for entry in &self.pantheon_bonuses {
            if !self.is_known_card(&entry.card) {
                return Err(DomainError::validation(format!(
                    "Pantheon bonus references unknown card '{}'",
                    entry.card
                )));
            }
        }

        if self.divisions.is_empty() {
            return Err(DomainError::validation("Division table is empty"));
        }
        for range in self.divisions.iter() {
            if range.name.trim().is_empty() {
                return Err(DomainError::validation("Division name cannot be empty"));
            }
            if range.min > range.max {
                return Err(DomainError::validation(format!(
                    "Division '{}' has min {} above max {}",
                    range.name, range.min, range.max
                )));
            }
        }

        Ok(())
    }
}

const LEGENDARY_CARDS: [&str; 40] = [
    "Banshee",
    "Bard",
    "Bruiser",
    "Blade Dancer",
    "Boreas",
    "Corsair",
    "Cultist",
    "Demon Hunter",
    "Demonologist",
    "Spirit Master",
    "Dryad",
    "Franky & Stein",
    "Frost",
    "Gun Slinger",
    "Harlequin",
    "Inquisitor",
    "Genie",
    "Hex",
    "Knight Statue",
    "Kobold",
    "Twilight Ranger",
    "Clock",
    "Meteor",
    "Minotaur",
    "Monk",
    "Swords",
    "Phoenix",
    "Riding Hood",
    "Robot",
    "Scrapper",
    "Stasis",
    "Summoner",
    "Tesla",
    "Trapper",
    "Treant",
    "Sea Dog",
    "Twins",
    "Witch",
    "Shaman",
    "Valkerie",
];

const COMMON_CARDS: [&str; 36] = [
    "Catapult",
    "Clown",
    "Crystalmancer",
    "Earth Elemental",
    "Cold Elemental",
    "Engineer",
    "Gargoyle",
    "Executioner",
    "Mime",
    "Plague Doctor",
    "Ivy",
    "Portal Keeper",
    "Pyrotechnic",
    "Reaper",
    "Portal Mage",
    "Thunderer",
    "Vampire",
    "Wind Archer",
    "Alchemist",
    "Banner",
    "Magic Cauldron",
    "Chemist",
    "Grindstone",
    "Priestess",
    "Sentry",
    "Sharpshooter",
    "Zealot",
    "Archer",
    "Bombardier",
    "Cold Mage",
    "Fire Mage",
    "Hunter",
    "Lightning Mage",
    "Poisoner",
    "Rogue",
    "Thrower",
];

// Spelling of "Shinning Stars" matches the names already used in issued codes.
const COMMUNITIES: [(&str, &str); 3] = [
    ("Shinning Stars", "🌟"),
    ("Empires Gaming", "🦁"),
    ("Ronin Gaming", "🥷"),
];

const HEROES: [(&str, &str); 15] = [
    ("Lucia (Legendary)", "Shadow Blade"),
    ("Necromancer (Legendary)", "Ethereal Phylactery"),
    ("Fortuna (Legendary)", "Lucky Coin"),
    ("Zeus (Legendary)", "Star Gaze"),
    ("Gadget (Epic)", "Rhandumization Key"),
    ("Mari (Epic)", "Unstable Jelly"),
    ("Snowflake (Epic)", "Ice Reflection"),
    ("Flicker (Epic)", "Royal Duck"),
    ("Jake Paul (Epic)", "RR Champion Belt"),
    ("Mermaid (Epic)", "Bubble Wand"),
    ("Trickster (Rare)", "Mana Power-up Flask"),
    ("Elementalist (Rare)", "Scroll of the Elements"),
    ("Jay (Rare)", "Ring of Rhandum"),
    ("Captain (Common)", "Treasure Compass"),
    ("Bestie (Common)", "Favorite Horn"),
];

const PANTHEON_BONUSES: [(&str, u32); 5] = [
    ("Twins", 20),
    ("Valkerie", 40),
    ("Phoenix", 20),
    ("Twilight Ranger", 20),
    ("Franky & Stein", 20),
];

const DIVISIONS: [(&str, u64, u64); 6] = [
    ("Lightweight", 0, 499),
    ("Cruiserweight", 500, 999),
    ("Middleweight", 1000, 1499),
    ("Heavyweight", 1500, 1999),
    ("Super Heavyweight", 2000, 2499),
    ("Champion", 2500, 10000),
];

impl Default for Catalog {
    fn default() -> Self {
        Self {
            legendary_cards: LEGENDARY_CARDS.iter().map(|c| c.to_string()).collect(),
            common_cards: COMMON_CARDS.iter().map(|c| c.to_string()).collect(),
            communities: COMMUNITIES
                .iter()
                .map(|(name, emoji)| CommunityEntry {
                    name: name.to_string(),
                    emoji: emoji.to_string(),
                })
                .collect(),
            heroes: HEROES
                .iter()
                .map(|(name, item)| HeroEntry {
                    name: name.to_string(),
                    default_item: item.to_string(),
                })
                .collect(),
            pantheon_bonuses: PANTHEON_BONUSES
                .iter()
                .map(|(card, percent)| PantheonEntry {
                    card: card.to_string(),
                    percent: *percent,
                })
                .collect(),
            weights: ScoringWeights::default(),
            divisions: DivisionTable::new(
                DIVISIONS
                    .iter()
                    .map(|(name, min, max)| DivisionRange::new(*name, *min, *max))
                    .collect(),
            ),
        }
    }
}
