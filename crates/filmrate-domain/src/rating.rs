//! Rating scale, aggregate summary and score distribution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest score a user can give.
pub const MIN_SCORE: i16 = 1;

/// Highest score a user can give.
pub const MAX_SCORE: i16 = 10;

/// A validated 1–10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct Score(i16);

/// Error returned for a score outside `MIN_SCORE..=MAX_SCORE`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("score must be between 1 and 10, got {0}")]
pub struct ScoreOutOfRange(pub i64);

impl Score {
    pub fn new(value: i64) -> Result<Self, ScoreOutOfRange> {
        if (i64::from(MIN_SCORE)..=i64::from(MAX_SCORE)).contains(&value) {
            Ok(Self(value as i16))
        } else {
            Err(ScoreOutOfRange(value))
        }
    }

    pub fn get(self) -> i16 {
        self.0
    }
}

impl TryFrom<i16> for Score {
    type Error = ScoreOutOfRange;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl From<Score> for i16 {
    fn from(score: Score) -> Self {
        score.0
    }
}

/// Derived rating fields stored on a movie.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_ratings: i64,
}

impl RatingSummary {
    /// Mean of `scores` rounded half-up to one decimal. Empty input yields `(0, 0)`.
    pub fn from_scores(scores: &[i16]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }
        let sum: i64 = scores.iter().map(|&s| i64::from(s)).sum();
        let count = scores.len() as i64;
        Self {
            average_rating: round_one_decimal(sum as f64 / count as f64),
            total_ratings: count,
        }
    }
}

/// Round half-up to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Dense score histogram: always exactly the keys 1..=10.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution(BTreeMap<i16, u64>);

impl Distribution {
    /// Build from `(score, count)` groups. Scores outside the scale are dropped.
    pub fn from_counts(groups: impl IntoIterator<Item = (i16, u64)>) -> Self {
        let mut map: BTreeMap<i16, u64> = (MIN_SCORE..=MAX_SCORE).map(|s| (s, 0)).collect();
        for (score, count) in groups {
            if let Some(slot) = map.get_mut(&score) {
                *slot += count;
            }
        }
        Self(map)
    }

    pub fn get(&self, score: i16) -> u64 {
        self.0.get(&score).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i16, u64)> + '_ {
        self.0.iter().map(|(&s, &c)| (s, c))
    }
}

impl Default for Distribution {
    fn default() -> Self {
        Self::from_counts([])
    }
}
