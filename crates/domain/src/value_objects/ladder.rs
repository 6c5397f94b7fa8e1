//! Skill ladder shapes and rank labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Highest-to-lowest rank range of a character's skill ladder.
///
/// Serialized as the string literals `"1-4"` and `"1-5"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LadderType {
    /// Ranks Great (+4) down to Average (+1).
    #[default]
    #[serde(rename = "1-4")]
    OneToFour,
    /// Ranks Superb (+5) down to Average (+1).
    #[serde(rename = "1-5")]
    OneToFive,
}

const RANKS_1_4: [i32; 4] = [4, 3, 2, 1];
const RANKS_1_5: [i32; 5] = [5, 4, 3, 2, 1];

// Quotas used when fitting arbitrary input onto a ladder. The 1-5 ladder keeps
// the same 1-2-3 growth as 1-4 and leaves its top rank empty.
const QUOTAS_1_4: [(i32, usize); 3] = [(4, 1), (3, 2), (2, 3)];
const QUOTAS_1_5: [(i32, usize); 4] = [(5, 0), (4, 1), (3, 2), (2, 3)];

impl LadderType {
    /// Ranks from highest to lowest.
    pub fn ranks(self) -> &'static [i32] {
        match self {
            Self::OneToFour => &RANKS_1_4,
            Self::OneToFive => &RANKS_1_5,
        }
    }

    pub fn highest_rank(self) -> i32 {
        match self {
            Self::OneToFour => 4,
            Self::OneToFive => 5,
        }
    }

    pub fn lowest_rank(self) -> i32 {
        1
    }

    pub fn contains_rank(self, rank: i32) -> bool {
        self.ranks().contains(&rank)
    }

    /// Pull an out-of-range rank back onto the ladder: anything above the top
    /// becomes the top rank, anything below (or zero) becomes the lowest.
    pub fn clamp_rank(self, rank: i32) -> i32 {
        rank.clamp(self.lowest_rank(), self.highest_rank())
    }

    /// Per-rank quotas for redistribution, highest rank first. The lowest rank
    /// is not listed; it is seeded separately.
    pub fn quotas(self) -> &'static [(i32, usize)] {
        match self {
            Self::OneToFour => &QUOTAS_1_4,
            Self::OneToFive => &QUOTAS_1_5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneToFour => "1-4",
            Self::OneToFive => "1-5",
        }
    }
}

impl fmt::Display for LadderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LadderType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1-4" => Ok(Self::OneToFour),
            "1-5" => Ok(Self::OneToFive),
            other => Err(DomainError::parse(format!("Unknown ladder type: {}", other))),
        }
    }
}

/// Adjectives for the ranks a character ladder can hold, lowest first.
const RANK_ADJECTIVES: [&str; 5] = ["Average", "Fair", "Good", "Great", "Superb"];

/// Caption for a rank row, e.g. `"Great (+4)"`. Ranks without an adjective
/// fall back to the signed number.
pub fn rank_label(rank: i32) -> String {
    let adjective = usize::try_from(rank)
        .ok()
        .and_then(|r| r.checked_sub(1))
        .and_then(|i| RANK_ADJECTIVES.get(i));
    match adjective {
        Some(adjective) => format!("{adjective} ({rank:+})"),
        None => format!("{rank:+}"),
    }
}
