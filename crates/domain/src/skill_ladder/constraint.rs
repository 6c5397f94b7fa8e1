//! Pyramid constraint model
//!
//! A ladder is valid when every entry sits on one of the ladder's ranks and,
//! for each adjacent pair of ranks `(higher, lower)` where `lower` is not the
//! lowest rank, `count(higher) <= count(lower)`. The lowest rank is a free
//! reservoir: it is unbounded and never constrains the rank above it.

use std::collections::BTreeMap;
use std::fmt;

use crate::entities::SkillEntry;
use crate::value_objects::LadderType;

/// Ranks of the ladder, highest first.
pub fn ranks_for(ladder: LadderType) -> Vec<i32> {
    ladder.ranks().to_vec()
}

/// Entry count per rank, zero-filled for every rank of the ladder. Entries
/// sitting outside the ladder are not counted.
pub fn counts_by_rank(entries: &[SkillEntry], ladder: LadderType) -> BTreeMap<i32, usize> {
    let mut counts: BTreeMap<i32, usize> = ladder.ranks().iter().map(|&r| (r, 0)).collect();
    for entry in entries {
        if let Some(count) = counts.get_mut(&entry.rank) {
            *count += 1;
        }
    }
    counts
}

/// Rank pairs the pyramid rule checks, highest pair first.
pub fn checked_pairs(ladder: LadderType) -> impl Iterator<Item = (i32, i32)> {
    let lowest = ladder.lowest_rank();
    ladder
        .ranks()
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .filter(move |&(_, lower)| lower != lowest)
}

/// Why a distribution is not a valid pyramid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PyramidViolation {
    /// An entry sits on a rank the ladder does not have.
    RankOutsideLadder { name: String, rank: i32 },
    /// A higher rank holds more entries than the rank below it.
    TopHeavy {
        higher: i32,
        higher_count: usize,
        lower: i32,
        lower_count: usize,
    },
}

impl fmt::Display for PyramidViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RankOutsideLadder { name, rank } => {
                write!(f, "{} is at rank {:+}, which is not on this ladder", name, rank)
            }
            Self::TopHeavy {
                higher,
                higher_count,
                lower,
                lower_count,
            } => write!(
                f,
                "rank {:+} has {} skills but rank {:+} only has {}",
                higher, higher_count, lower, lower_count
            ),
        }
    }
}

/// First problem found, checking ranks before pairs and pairs top-down.
pub fn first_violation(entries: &[SkillEntry], ladder: LadderType) -> Option<PyramidViolation> {
    if let Some(entry) = entries.iter().find(|e| !ladder.contains_rank(e.rank)) {
        return Some(PyramidViolation::RankOutsideLadder {
            name: entry.name.clone(),
            rank: entry.rank,
        });
    }
    violation_in_counts(&counts_by_rank(entries, ladder), ladder)
}

/// First top-heavy pair in a precomputed count table.
pub fn violation_in_counts(
    counts: &BTreeMap<i32, usize>,
    ladder: LadderType,
) -> Option<PyramidViolation> {
    checked_pairs(ladder).find_map(|(higher, lower)| {
        let higher_count = counts.get(&higher).copied().unwrap_or(0);
        let lower_count = counts.get(&lower).copied().unwrap_or(0);
        (higher_count > lower_count).then_some(PyramidViolation::TopHeavy {
            higher,
            higher_count,
            lower,
            lower_count,
        })
    })
}

pub fn is_valid_distribution(entries: &[SkillEntry], ladder: LadderType) -> bool {
    first_violation(entries, ladder).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ladder(ranks: &[(&str, i32)]) -> Vec<SkillEntry> {
        ranks
            .iter()
            .map(|(name, rank)| SkillEntry::new(format!("skill-{}", name.to_lowercase()), *name, *rank))
            .collect()
    }

    #[test]
    fn test_ranks_for_is_descending() {
        assert_eq!(ranks_for(LadderType::OneToFour), vec![4, 3, 2, 1]);
        assert_eq!(ranks_for(LadderType::OneToFive), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_counts_are_zero_filled() {
        let counts = counts_by_rank(&ladder(&[("Fight", 3)]), LadderType::OneToFive);
        assert_eq!(counts.len(), 5);
        assert_eq!(counts[&3], 1);
        assert_eq!(counts[&5], 0);
    }

    #[test]
    fn test_counts_ignore_off_ladder_ranks() {
        let counts = counts_by_rank(&ladder(&[("Fight", 5)]), LadderType::OneToFour);
        assert!(counts.values().all(|&c| c == 0));
    }

    #[test]
    fn test_checked_pairs_skip_lowest_rank() {
        let pairs: Vec<_> = checked_pairs(LadderType::OneToFour).collect();
        assert_eq!(pairs, vec![(4, 3), (3, 2)]);
    }

    #[test]
    fn test_empty_ladder_is_valid() {
        assert!(is_valid_distribution(&[], LadderType::OneToFour));
    }

    #[test]
    fn test_lowest_rank_is_unbounded() {
        let entries = ladder(&[("A", 1), ("B", 1), ("C", 1), ("D", 1), ("E", 1), ("F", 1)]);
        assert!(is_valid_distribution(&entries, LadderType::OneToFour));
    }

    #[test]
    fn test_lone_top_entry_is_invalid() {
        let entries = ladder(&[("Fight", 4)]);
        assert_eq!(
            first_violation(&entries, LadderType::OneToFour),
            Some(PyramidViolation::TopHeavy {
                higher: 4,
                higher_count: 1,
                lower: 3,
                lower_count: 0
            })
        );
    }

    #[test]
    fn test_second_rank_only_needs_to_match_third() {
        let entries = ladder(&[("Fight", 4), ("Shoot", 3), ("Notice", 3), ("Athletics", 2), ("Drive", 2)]);
        assert!(is_valid_distribution(&entries, LadderType::OneToFour));
    }

    #[test]
    fn test_rank_outside_ladder_is_invalid() {
        let entries = ladder(&[("Fight", 5)]);
        assert!(matches!(
            first_violation(&entries, LadderType::OneToFour),
            Some(PyramidViolation::RankOutsideLadder { rank: 5, .. })
        ));
    }

    #[test]
    fn test_violation_message_names_ranks() {
        let v = PyramidViolation::TopHeavy {
            higher: 3,
            higher_count: 2,
            lower: 2,
            lower_count: 1,
        };
        assert_eq!(v.to_string(), "rank +3 has 2 skills but rank +2 only has 1");
    }
}
