//! Value objects - Immutable objects defined by their attributes

mod card;
mod community;
mod discord_id;
mod numeric;

// Deck slots and card levels
pub use card::{
    is_level_allowed, level_label, level_options, max_level_for, CardSlot, LevelOption,
    DECK_SIZE, MAX_REINCARNATED_LEVEL, MAX_STANDARD_LEVEL, MIN_CARD_LEVEL,
};

pub use community::{Community, MAX_CUSTOM_COMMUNITY_LEN, MIN_CUSTOM_COMMUNITY_LEN};

pub use discord_id::{DiscordId, SanitizedId, MAX_DISCORD_ID_LEN, MIN_DISCORD_ID_LEN};

// Lenient parsing of typed-in numbers
pub use numeric::{parse_level, parse_stat};
