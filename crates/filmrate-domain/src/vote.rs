//! Review vote types.

use serde::{Deserialize, Serialize};

/// Whether a voter found a review useful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Helpful,
    Unhelpful,
}

impl VoteType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Helpful => "helpful",
            Self::Unhelpful => "unhelpful",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "helpful" => Some(Self::Helpful),
            "unhelpful" => Some(Self::Unhelpful),
            _ => None,
        }
    }
}
