extern crate self as rushroyale_domain;

pub mod build;
pub mod catalog;
pub mod error;
pub mod export_code;
pub mod form;
pub mod strength;
pub mod submission;
pub mod value_objects;

pub use build::{PlayerBuild, DEFAULT_TIMEZONE};
pub use catalog::{Catalog, CommunityEntry, HeroEntry, PantheonEntry};
pub use error::DomainError;

// Export code encoding
pub use export_code::{
    decode as decode_export_code, encode as encode_export_code, find_unsafe_field,
    ExportCodeError, UnsafeField, FIELD_COUNT, FIELD_SEPARATOR, NO_HERO_ITEM, NO_HERO_ITEM_LEVEL,
};

pub use form::{CardOption, RegistrationForm};

// Strength calculation
pub use strength::{
    calculate_strength, DivisionRange, DivisionTable, PantheonBonus, ScoringWeights,
    StrengthCalculator, StrengthResult,
};

pub use submission::{
    check_registration, validate_submission, RegistrationContext, RegistrationRequest, Submission,
    SubmissionError,
};

pub use value_objects::{
    is_level_allowed, level_label, level_options, max_level_for, parse_level, parse_stat,
    CardSlot, Community, DiscordId, LevelOption, SanitizedId, DECK_SIZE, MAX_REINCARNATED_LEVEL,
    MAX_STANDARD_LEVEL, MIN_CARD_LEVEL,
};
