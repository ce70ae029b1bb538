//! Strength calculation - turns a player's stats and deck into a power score
//! and a division.
//!
//! The calculation runs in two floored steps:
//!
//! 1. `adjusted_crit = floor(base_crit * (1 + sum of pantheon fractions))`
//! 2. `total = floor(adjusted_crit * w_crit + legendarity * w_leg + perks * w_perks)`
//!
//! Both steps run in `f64` with fractional bonuses and weights, summed in
//! slot order then left to right, so scores match the ones the registration
//! page has always shown (`45 * 1.4` floors to 62, not 63). The two floors
//! must stay separate: fusing them shifts totals by one near division
//! boundaries.

use serde::{Deserialize, Serialize};

use crate::build::PlayerBuild;
use crate::catalog::Catalog;
use crate::value_objects::CardSlot;

/// Percentage weight of each stat in the total strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub crit: u32,
    pub legendarity: u32,
    pub perks: u32,
}

impl ScoringWeights {
    /// Weights as fractions `(crit, legendarity, perks)`, e.g. `(0.4, 0.4, 0.2)`.
    pub fn fractions(&self) -> (f64, f64, f64) {
        (
            percent_fraction(self.crit),
            percent_fraction(self.legendarity),
            percent_fraction(self.perks),
        )
    }
}

fn percent_fraction(percent: u32) -> f64 {
    f64::from(percent) / 100.0
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            crit: 40,
            legendarity: 40,
            perks: 20,
        }
    }
}

/// A named, inclusive strength range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionRange {
    pub name: String,
    pub min: u64,
    pub max: u64,
}

impl DivisionRange {
    pub fn new(name: impl Into<String>, min: u64, max: u64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }

    pub fn contains(&self, strength: u64) -> bool {
        (self.min..=self.max).contains(&strength)
    }
}

/// Division ranges in declaration order.
///
/// Lookup is first-match in this order, not by sorted range, so overlapping
/// or unsorted tables resolve to whichever range was declared first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DivisionTable(Vec<DivisionRange>);

impl DivisionTable {
    pub fn new(ranges: Vec<DivisionRange>) -> Self {
        Self(ranges)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DivisionRange> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First declared range containing `strength`.
    pub fn classify(&self, strength: u64) -> Option<&DivisionRange> {
        self.0.iter().find(|range| range.contains(strength))
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|range| range.name.as_str()).collect()
    }
}

/// A pantheon card found in the deck and the crit bonus it grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PantheonBonus {
    pub name: String,
    pub percent: u32,
}

impl PantheonBonus {
    /// Bonus as a fraction (20% -> 0.2)
    pub fn bonus_fraction(&self) -> f64 {
        percent_fraction(self.percent)
    }
}

/// Derived strength for one build. Rebuilt from scratch on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthResult {
    pub base_crit: u32,
    pub adjusted_crit: u64,
    pub legendarity: u32,
    pub perks: u32,
    pub total_strength: u64,
    /// `None` when the total falls outside every division range
    pub division: Option<String>,
    /// Pantheon cards in slot order
    pub pantheon_cards: Vec<PantheonBonus>,
}

impl StrengthResult {
    /// The total landed in a division; only classified results can be submitted.
    pub fn is_classified(&self) -> bool {
        self.division.is_some()
    }

    /// Summed pantheon bonus (bonuses stack additively).
    pub fn pantheon_bonus_percent(&self) -> u32 {
        self.pantheon_cards.iter().map(|p| p.percent).sum()
    }
}

/// Strength calculator bound to a catalog's bonus table, weights and divisions.
pub struct StrengthCalculator<'a> {
    catalog: &'a Catalog,
}

impl<'a> StrengthCalculator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Strength for a build, or `None` while required stats are missing.
    pub fn calculate(&self, build: &PlayerBuild) -> Option<StrengthResult> {
        self.calculate_stats(
            build.crit_level,
            build.legendarity,
            build.perks_level,
            &build.cards,
        )
    }

    /// Strength from raw stats and a deck.
    ///
    /// Returns `None` unless crit and legendarity are non-zero and perks is
    /// set. Perks of zero is valid; crit or legendarity of zero is treated as
    /// not entered. Unknown cards simply contribute no bonus.
    pub fn calculate_stats(
        &self,
        base_crit: Option<u32>,
        legendarity: Option<u32>,
        perks: Option<u32>,
        cards: &[CardSlot],
    ) -> Option<StrengthResult> {
        let base_crit = base_crit.filter(|v| *v > 0)?;
        let legendarity = legendarity.filter(|v| *v > 0)?;
        let perks = perks?;

        let pantheon_cards: Vec<PantheonBonus> = cards
            .iter()
            .filter(|slot| !slot.is_empty())
            .filter_map(|slot| {
                self.catalog
                    .pantheon_percent(&slot.name)
                    .map(|percent| PantheonBonus {
                        name: slot.name.clone(),
                        percent,
                    })
            })
            .collect();
        let pantheon_bonus = pantheon_cards
            .iter()
            .fold(0.0, |sum, p| sum + p.bonus_fraction());

        let adjusted_crit = floor_score(f64::from(base_crit) * (1.0 + pantheon_bonus));

        let (w_crit, w_legendarity, w_perks) = self.catalog.weights.fractions();
        let total_strength = floor_score(
            adjusted_crit as f64 * w_crit
                + f64::from(legendarity) * w_legendarity
                + f64::from(perks) * w_perks,
        );

        let division = self
            .catalog
            .divisions
            .classify(total_strength)
            .map(|range| range.name.clone());

        Some(StrengthResult {
            base_crit,
            adjusted_crit,
            legendarity,
            perks,
            total_strength,
            division,
            pantheon_cards,
        })
    }
}

/// Floors a non-negative score. Saturates instead of wrapping.
fn floor_score(value: f64) -> u64 {
    value.floor() as u64
}

/// Convenience wrapper around [`StrengthCalculator::calculate`].
pub fn calculate_strength(build: &PlayerBuild, catalog: &Catalog) -> Option<StrengthResult> {
    StrengthCalculator::new(catalog).calculate(build)
}
