//! Export codes - a player build flattened into one comma-separated line.
//!
//! Format (21 fields, no escaping):
//!
//! ```text
//! GameName,GameID,Crit,Legendarity,Perks,Timezone,Community,Hero,HeroLvl,HeroItem,HeroItemLvl,
//! Card1,Card1Lvl,Card2,Card2Lvl,Card3,Card3Lvl,Card4,Card4Lvl,Card5,Card5Lvl
//! ```
//!
//! Codes already handed out to players must keep decoding, so the format is
//! frozen. A comma inside any free-text field shifts every later field, and
//! decoding trims every field, so surrounding spaces are lost. Use
//! [`find_unsafe_field`] to warn before encoding such a build.

use std::fmt;

use thiserror::Error;

use crate::build::PlayerBuild;
use crate::catalog::Catalog;
use crate::value_objects::{
    is_level_allowed, parse_level, parse_stat, CardSlot, Community, DECK_SIZE,
};

pub const FIELD_SEPARATOR: char = ',';

/// Number of fields in a complete code
pub const FIELD_COUNT: usize = 21;

/// Written in place of a missing hero item
pub const NO_HERO_ITEM: &str = "None";

/// Written in place of a missing hero item level
pub const NO_HERO_ITEM_LEVEL: &str = "0";

/// Index of the first card name
const CARDS_OFFSET: usize = 11;

/// Error when decoding an export code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportCodeError {
    /// Nothing was pasted
    #[error("Export code is empty")]
    Empty,
    /// Too few fields - usually a partially copied code
    #[error("Invalid export code format: expected {expected} fields, found {found}")]
    InvalidFormat { expected: usize, found: usize },
}

/// Flatten a build into an export code.
pub fn encode(build: &PlayerBuild) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(FIELD_COUNT);

    parts.push(build.game_username.clone());
    parts.push(build.game_id.clone());
    parts.push(number_field(build.crit_level));
    parts.push(number_field(build.legendarity));
    parts.push(number_field(build.perks_level));
    parts.push(build.timezone.clone());
    parts.push(
        build
            .community
            .as_ref()
            .map(|c| c.as_str().to_string())
            .unwrap_or_default(),
    );
    parts.push(build.hero.clone());
    parts.push(number_field(build.hero_level));
    parts.push(
        build
            .hero_item
            .as_deref()
            .filter(|item| !item.is_empty())
            .unwrap_or(NO_HERO_ITEM)
            .to_string(),
    );
    parts.push(
        build
            .hero_item_level
            .map(|level| level.to_string())
            .unwrap_or_else(|| NO_HERO_ITEM_LEVEL.to_string()),
    );

    for slot in &build.cards {
        parts.push(slot.name.clone());
        parts.push(slot.level.map(|l| l.to_string()).unwrap_or_default());
    }

    let separator = FIELD_SEPARATOR.to_string();
    parts.join(separator.as_str())
}

/// Rebuild a player build from an export code.
///
/// Fields are trimmed; anything past the 21st field is ignored. A card level
/// the decoded card cannot have (e.g. 17 on a non-legendary card) is dropped.
///
/// # Errors
///
/// Returns `ExportCodeError::Empty` for a blank code and
/// `ExportCodeError::InvalidFormat` when fewer than 21 fields are present.
pub fn decode(code: &str, catalog: &Catalog) -> Result<PlayerBuild, ExportCodeError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ExportCodeError::Empty);
    }

    let parts: Vec<&str> = code.split(FIELD_SEPARATOR).map(str::trim).collect();
    if parts.len() < FIELD_COUNT {
        return Err(ExportCodeError::InvalidFormat {
            expected: FIELD_COUNT,
            found: parts.len(),
        });
    }

    let hero_item = Some(parts[9])
        .filter(|item| !item.is_empty() && *item != NO_HERO_ITEM)
        .map(str::to_string);
    // The level only means something when there is an item to level
    let hero_item_level = hero_item
        .as_ref()
        .and(Some(parts[10]))
        .filter(|level| !level.is_empty() && *level != NO_HERO_ITEM_LEVEL)
        .and_then(parse_stat);

    let mut cards: [CardSlot; DECK_SIZE] = Default::default();
    for (i, slot) in cards.iter_mut().enumerate() {
        let name = parts[CARDS_OFFSET + i * 2];
        if name.is_empty() {
            continue;
        }
        // Level options depend on the card, so resolve the name first
        let level = parse_level(parts[CARDS_OFFSET + i * 2 + 1])
            .filter(|level| is_level_allowed(name, *level, catalog));
        *slot = CardSlot {
            name: name.to_string(),
            level,
        };
    }

    Ok(PlayerBuild {
        game_username: parts[0].to_string(),
        game_id: parts[1].to_string(),
        crit_level: parse_stat(parts[2]),
        legendarity: parse_stat(parts[3]),
        perks_level: parse_stat(parts[4]),
        timezone: parts[5].to_string(),
        community: Community::classify(parts[6], catalog),
        hero: parts[7].to_string(),
        hero_level: parse_stat(parts[8]),
        hero_item,
        hero_item_level,
        cards,
    })
}

/// A free-text field that will not come back unchanged from its export code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsafeField {
    /// Contains the separator; every later field shifts
    Separator(&'static str),
    /// Leading or trailing whitespace, trimmed away on decode
    Whitespace(&'static str),
}

impl UnsafeField {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Separator(field) | Self::Whitespace(field) => field,
        }
    }
}

impl fmt::Display for UnsafeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Separator(field) => write!(
                f,
                "{} contains a comma, the export code will not import correctly",
                field
            ),
            Self::Whitespace(field) => write!(
                f,
                "{} starts or ends with spaces, they are dropped on import",
                field
            ),
        }
    }
}

/// First free-text field, in code order, that would not round-trip.
pub fn find_unsafe_field(build: &PlayerBuild) -> Option<UnsafeField> {
    let community = build.community.as_ref().map(|c| c.as_str()).unwrap_or("");
    let hero_item = build.hero_item.as_deref().unwrap_or("");
    let mut fields = vec![
        ("game_username", build.game_username.as_str()),
        ("game_id", build.game_id.as_str()),
        ("timezone", build.timezone.as_str()),
        ("community", community),
        ("hero", build.hero.as_str()),
        ("hero_item", hero_item),
    ];
    fields.extend(build.cards.iter().map(|slot| ("card", slot.name.as_str())));

    fields.into_iter().find_map(|(field, value)| {
        if value.contains(FIELD_SEPARATOR) {
            Some(UnsafeField::Separator(field))
        } else if value.trim() != value {
            Some(UnsafeField::Whitespace(field))
        } else {
            None
        }
    })
}

fn number_field(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_build() -> PlayerBuild {
        PlayerBuild {
            game_username: "RoyalPlayer".to_string(),
            game_id: "987654".to_string(),
            crit_level: Some(50),
            legendarity: Some(30),
            perks_level: Some(20),
            timezone: "UTC+01:00".to_string(),
            community: Some(Community::Listed("Ronin Gaming".to_string())),
            hero: "Zeus (Legendary)".to_string(),
            hero_level: Some(9),
            hero_item: Some("Star Gaze".to_string()),
            hero_item_level: Some(4),
            cards: [
                CardSlot::new("Phoenix", 17),
                CardSlot::new("Archer", 15),
                CardSlot::new("Twins", 12),
                CardSlot::new("Bard", 10),
                CardSlot::new("Hunter", 11),
            ],
        }
    }

    #[test]
    fn encodes_fields_in_order() {
        let code = encode(&sample_build());
        assert_eq!(
            code,
            "RoyalPlayer,987654,50,30,20,UTC+01:00,Ronin Gaming,Zeus (Legendary),9,Star Gaze,4,\
             Phoenix,17,Archer,15,Twins,12,Bard,10,Hunter,11"
        );
        assert_eq!(code.split(FIELD_SEPARATOR).count(), FIELD_COUNT);
    }

    #[test]
    fn missing_hero_item_uses_placeholders() {
        let build = PlayerBuild {
            hero_item: None,
            hero_item_level: None,
            ..sample_build()
        };
        let code = encode(&build);
        let parts: Vec<&str> = code.split(',').collect();
        assert_eq!(parts[9], "None");
        assert_eq!(parts[10], "0");
    }

    #[test]
    fn round_trips_listed_community() {
        let catalog = Catalog::default();
        let build = sample_build();
        assert_eq!(decode(&encode(&build), &catalog).unwrap(), build);
    }

    #[test]
    fn round_trips_custom_community_and_no_hero_item() {
        let catalog = Catalog::default();
        let build = PlayerBuild {
            community: Some(Community::custom("Night Owls")),
            hero_item: None,
            hero_item_level: None,
            perks_level: Some(0),
            ..sample_build()
        };
        assert_eq!(decode(&encode(&build), &catalog).unwrap(), build);
    }

    #[test]
    fn round_trips_partial_build() {
        let catalog = Catalog::default();
        let mut build = PlayerBuild {
            game_username: "Newbie".to_string(),
            ..PlayerBuild::default()
        };
        build.cards[2] = CardSlot::new("Clown", 3);
        build.cards[4] = CardSlot {
            name: "Valkerie".to_string(),
            level: None,
        };
        assert_eq!(decode(&encode(&build), &catalog).unwrap(), build);
    }

    #[test]
    fn too_few_fields_is_invalid_format() {
        let catalog = Catalog::default();
        let err = decode("RoyalPlayer,987654,50,30,20", &catalog).unwrap_err();
        assert_eq!(
            err,
            ExportCodeError::InvalidFormat {
                expected: 21,
                found: 5
            }
        );
        assert_eq!(decode("   ", &catalog).unwrap_err(), ExportCodeError::Empty);
    }

    #[test]
    fn extra_fields_are_ignored_and_parts_trimmed() {
        let catalog = Catalog::default();
        let code = format!(" {} ,extra,stuff", encode(&sample_build()).replace(',', " , "));
        assert_eq!(decode(&code, &catalog).unwrap(), sample_build());
    }

    #[test]
    fn hero_item_level_needs_an_item() {
        let catalog = Catalog::default();
        let code = "P,1,50,30,20,UTC-05:00,Ronin Gaming,Zeus (Legendary),9,None,7,\
                    Phoenix,1,Archer,1,Twins,1,Bard,1,Hunter,1";
        let build = decode(code, &catalog).unwrap();
        assert_eq!(build.hero_item, None);
        assert_eq!(build.hero_item_level, None);
    }

    #[test]
    fn reincarnated_level_only_for_legendary_cards() {
        let catalog = Catalog::default();
        let code = "P,1,50,30,20,UTC-05:00,Ronin Gaming,Zeus (Legendary),9,None,0,\
                    Phoenix,18,Archer,17,Twins,19,Bard,abc,Hunter,15";
        let build = decode(code, &catalog).unwrap();
        assert_eq!(build.cards[0].level, Some(18));
        assert_eq!(build.cards[1].level, None);
        assert_eq!(build.cards[2].level, None);
        assert_eq!(build.cards[3].level, None);
        assert_eq!(build.cards[4].level, Some(15));
    }

    #[test]
    fn non_numeric_stats_decode_as_unset() {
        let catalog = Catalog::default();
        let code = "P,1,lots,,20,UTC-05:00,Ronin Gaming,Zeus (Legendary),x,None,0,,,,,,,,,,";
        let build = decode(code, &catalog).unwrap();
        assert_eq!(build.crit_level, None);
        assert_eq!(build.legendarity, None);
        assert_eq!(build.perks_level, Some(20));
        assert_eq!(build.hero_level, None);
        assert!(build.cards.iter().all(CardSlot::is_empty));
    }

    #[test]
    fn comma_in_community_shifts_fields() {
        let catalog = Catalog::default();
        let build = PlayerBuild {
            community: Some(Community::custom("Owls, Inc")),
            ..sample_build()
        };
        assert_eq!(
            find_unsafe_field(&build),
            Some(UnsafeField::Separator("community"))
        );
        let decoded = decode(&encode(&build), &catalog).unwrap();
        assert_ne!(decoded, build);
        assert_eq!(decoded.hero, "Inc");
    }

    #[test]
    fn surrounding_spaces_are_lost_on_decode() {
        let catalog = Catalog::default();
        let build = PlayerBuild {
            game_id: " 987654 ".to_string(),
            ..sample_build()
        };
        let unsafe_field = find_unsafe_field(&build).unwrap();
        assert_eq!(unsafe_field, UnsafeField::Whitespace("game_id"));
        assert!(unsafe_field.to_string().starts_with("game_id starts or ends with spaces"));

        let decoded = decode(&encode(&build), &catalog).unwrap();
        assert_eq!(decoded.game_id, "987654");
        assert_eq!(decoded, sample_build());
    }

    #[test]
    fn separator_is_reported_before_later_whitespace() {
        let build = PlayerBuild {
            game_username: "Royal,Player".to_string(),
            hero: "Zeus ".to_string(),
            ..sample_build()
        };
        let unsafe_field = find_unsafe_field(&build).unwrap();
        assert_eq!(unsafe_field.field(), "game_username");
        assert!(unsafe_field.to_string().contains("contains a comma"));
    }

    #[test]
    fn safe_build_has_no_unsafe_field() {
        assert_eq!(find_unsafe_field(&sample_build()), None);
    }
}
