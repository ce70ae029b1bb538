//! Community the player registers under.
//!
//! Players either pick one of the catalog communities or type their own.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::Catalog;
use crate::error::DomainError;

/// Minimum length for a typed-in community name
pub const MIN_CUSTOM_COMMUNITY_LEN: usize = 2;

/// Maximum length for a typed-in community name
pub const MAX_CUSTOM_COMMUNITY_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Community {
    /// One of the catalog communities
    Listed(String),
    /// Free text typed by the player
    Custom(String),
}

impl Community {
    /// Match a raw community name against the catalog.
    ///
    /// Returns `None` for a blank name. Anything not in the catalog is
    /// treated as a custom community.
    pub fn classify(name: &str, catalog: &Catalog) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        if catalog.is_listed_community(name) {
            Some(Self::Listed(name.to_string()))
        } else {
            Some(Self::Custom(name.to_string()))
        }
    }

    /// A typed-in community, trimmed.
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Listed(name) | Self::Custom(name) => name,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Check the community can be submitted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a custom name shorter than 2 or
    /// longer than 50 characters, and `DomainError::Unknown` for a listed
    /// community the catalog does not contain.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), DomainError> {
        match self {
            Self::Listed(name) => {
                if catalog.is_listed_community(name) {
                    Ok(())
                } else {
                    Err(DomainError::unknown("community", name.clone()))
                }
            }
            Self::Custom(name) => {
                let len = name.trim().chars().count();
                if len < MIN_CUSTOM_COMMUNITY_LEN {
                    return Err(DomainError::validation(format!(
                        "Community name must be at least {} characters",
                        MIN_CUSTOM_COMMUNITY_LEN
                    )));
                }
                if len > MAX_CUSTOM_COMMUNITY_LEN {
                    return Err(DomainError::validation(format!(
                        "Community name cannot exceed {} characters",
                        MAX_CUSTOM_COMMUNITY_LEN
                    )));
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Community {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
