//! Redistribution: reshape an arbitrary ranked list into a valid pyramid.
//!
//! `fit_to_pyramid` is the quota-driven fit used for freshly generated
//! ladders. `refit_preserving` reshapes an existing ladder around entries that
//! must not move (locked or hand-edited ones).

use std::cmp::Reverse;
use std::collections::HashSet;

use super::constraint::{checked_pairs, counts_by_rank, violation_in_counts, PyramidViolation};
use crate::common::name_key;
use crate::entities::SkillEntry;
use crate::ids::skill_id_for;
use crate::value_objects::LadderType;

/// Entries seeded onto the lowest rank after the quotas are filled.
pub const LOWEST_RANK_CAP: usize = 4;

/// Fit `entries` onto `ladder` using the fixed per-rank quotas.
///
/// Entries are taken in descending rank order (stable on ties). Blank and
/// case-insensitively duplicated names are discarded. Whatever is left after
/// the quotas and the lowest-rank cap is dropped. Every result gets a fresh
/// slug identity; `locked` is cleared and `user_edited` carried over.
///
/// Short inputs cannot fill the quotas, so a final pass demotes the last
/// entry of any top-heavy rank until the ladder is valid.
pub fn fit_to_pyramid(entries: &[SkillEntry], ladder: LadderType) -> Vec<SkillEntry> {
    let mut sorted: Vec<&SkillEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.rank.cmp(&a.rank));

    let mut seen: HashSet<String> = HashSet::new();
    let mut queue = sorted.into_iter().filter(move |e| {
        let key = name_key(&e.name);
        !key.is_empty() && seen.insert(key)
    });

    let mut placed: Vec<SkillEntry> = Vec::new();
    let mut take = |rank: i32, count: usize, placed: &mut Vec<SkillEntry>| {
        for entry in queue.by_ref().take(count) {
            placed.push(
                SkillEntry::new("", entry.name.trim(), rank).with_user_edited(entry.user_edited),
            );
        }
    };
    for &(rank, quota) in ladder.quotas() {
        take(rank, quota, &mut placed);
    }
    take(ladder.lowest_rank(), LOWEST_RANK_CAP, &mut placed);

    demote_until_valid(&mut placed, ladder);
    assign_fresh_ids(&mut placed);
    placed
}

/// Reshape `entries` for `ladder`, keeping pinned entries where they are.
///
/// Pinned entries keep identity and rank, even when the rank is off the
/// ladder. Unpinned entries start at their own clamped rank; for each top-heavy pair the last
/// unpinned entry of the higher rank is demoted, or, when that rank is fully
/// pinned, an unpinned entry from below is promoted into the lower rank.
/// Nothing is dropped except blank and duplicated names. The result can still
/// be invalid when there are too few unpinned entries to balance the pinned
/// ones, or when a pinned entry sits outside the ladder; callers check with
/// `is_valid_distribution`.
pub fn refit_preserving<F>(entries: &[SkillEntry], ladder: LadderType, pinned: F) -> Vec<SkillEntry>
where
    F: Fn(&SkillEntry) -> bool,
{
    let pinned_keys: HashSet<String> = entries
        .iter()
        .filter(|e| pinned(e))
        .map(SkillEntry::name_key)
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut slots: Vec<Slot> = Vec::with_capacity(entries.len());
    for entry in entries {
        let key = entry.name_key();
        if key.is_empty() {
            continue;
        }
        let is_pinned = pinned(entry);
        if !is_pinned && pinned_keys.contains(&key) {
            continue;
        }
        if !seen.insert(key) {
            continue;
        }
        let mut entry = entry.clone();
        if !is_pinned {
            entry.rank = ladder.clamp_rank(entry.rank);
        }
        slots.push(Slot {
            entry,
            pinned: is_pinned,
        });
    }

    let max_steps = (slots.len() + 1) * ladder.ranks().len() * 2;
    for _ in 0..max_steps {
        let counts = counts_by_rank(&entries_of(&slots), ladder);
        let Some(PyramidViolation::TopHeavy { higher, lower, .. }) =
            violation_in_counts(&counts, ladder)
        else {
            break;
        };

        if let Some(slot) = slots
            .iter_mut()
            .rev()
            .find(|s| !s.pinned && s.entry.rank == higher)
        {
            slot.entry.rank = lower;
            continue;
        }

        // Promote from the lowest rank first, latest entry first.
        let donor = slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.pinned && s.entry.rank < lower)
            .min_by_key(|(i, s)| (s.entry.rank, Reverse(*i)))
            .map(|(i, _)| i);
        match donor {
            Some(i) => slots[i].entry.rank = lower,
            None => break,
        }
    }

    let mut used: HashSet<String> = slots
        .iter()
        .filter(|s| s.pinned)
        .map(|s| s.entry.id.as_str().to_string())
        .collect();
    for slot in slots.iter_mut().filter(|s| !s.pinned) {
        let keep = !slot.entry.id.is_blank() && !used.contains(slot.entry.id.as_str());
        if !keep {
            slot.entry.id = skill_id_for(&slot.entry.name, |c| used.contains(c));
        }
        used.insert(slot.entry.id.as_str().to_string());
    }

    let mut result: Vec<SkillEntry> = slots.into_iter().map(|s| s.entry).collect();
    result.sort_by(|a, b| b.rank.cmp(&a.rank));
    result
}

struct Slot {
    entry: SkillEntry,
    pinned: bool,
}

fn entries_of(slots: &[Slot]) -> Vec<SkillEntry> {
    slots.iter().map(|s| s.entry.clone()).collect()
}

/// Demote the last entry of the first top-heavy rank until no checked pair is
/// violated. Entries are grouped by rank in descending order, so demoting the
/// last of a group keeps the name order intact.
fn demote_until_valid(placed: &mut [SkillEntry], ladder: LadderType) {
    loop {
        let counts = counts_by_rank(placed, ladder);
        let violation = checked_pairs(ladder).find(|(higher, lower)| {
            counts.get(higher).copied().unwrap_or(0) > counts.get(lower).copied().unwrap_or(0)
        });
        let Some((higher, lower)) = violation else {
            break;
        };
        match placed.iter_mut().rev().find(|e| e.rank == higher) {
            Some(entry) => entry.rank = lower,
            None => break,
        }
    }
}

fn assign_fresh_ids(placed: &mut [SkillEntry]) {
    let mut used: HashSet<String> = HashSet::new();
    for entry in placed.iter_mut() {
        entry.id = skill_id_for(&entry.name, |c| used.contains(c));
        used.insert(entry.id.as_str().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill_ladder::constraint::is_valid_distribution;

    fn named(items: &[(&str, i32)]) -> Vec<SkillEntry> {
        items
            .iter()
            .map(|(name, rank)| SkillEntry::new(format!("skill-{}", name.to_lowercase()), *name, *rank))
            .collect()
    }

    fn pairs(entries: &[SkillEntry]) -> Vec<(String, i32)> {
        entries.iter().map(|e| (e.name.clone(), e.rank)).collect()
    }

    fn expected(items: &[(&str, i32)]) -> Vec<(String, i32)> {
        items.iter().map(|(n, r)| (n.to_string(), *r)).collect()
    }

    #[test]
    fn test_fit_consumes_quotas_in_input_order() {
        let input = named(&[("A", 9), ("B", 9), ("C", 9), ("D", 9), ("E", 9), ("F", 9), ("G", 9)]);
        let fitted = fit_to_pyramid(&input, LadderType::OneToFour);
        assert_eq!(
            pairs(&fitted),
            expected(&[("A", 4), ("B", 3), ("C", 3), ("D", 2), ("E", 2), ("F", 2), ("G", 1)])
        );
    }

    #[test]
    fn test_fit_caps_lowest_rank_and_drops_overflow() {
        let names: Vec<String> = (0..14).map(|i| format!("S{i:02}")).collect();
        let input: Vec<SkillEntry> = names
            .iter()
            .map(|n| SkillEntry::new(n.clone(), n.clone(), 2))
            .collect();
        let fitted = fit_to_pyramid(&input, LadderType::OneToFour);
        assert_eq!(fitted.len(), 10);
        assert_eq!(fitted.iter().filter(|e| e.rank == 1).count(), LOWEST_RANK_CAP);
        assert!(fitted.iter().all(|e| e.name != "S10"));
    }

    #[test]
    fn test_fit_sorts_by_rank_stably() {
        let input = named(&[("Low", 1), ("High", 5), ("MidA", 3), ("MidB", 3)]);
        let fitted = fit_to_pyramid(&input, LadderType::OneToFour);
        assert_eq!(fitted[0].name, "High");
        assert_eq!(fitted[0].rank, 4);
        assert_eq!(fitted[1].name, "MidA");
        assert_eq!(fitted[2].name, "MidB");
        assert!(is_valid_distribution(&fitted, LadderType::OneToFour));
    }

    #[test]
    fn test_fit_skips_duplicates_and_blank_names() {
        let input = named(&[("Fight", 4), ("fight", 3), ("  ", 3), ("Shoot", 3), ("Lore", 2)]);
        let fitted = fit_to_pyramid(&input, LadderType::OneToFour);
        let names: Vec<&str> = fitted.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Fight", "Shoot", "Lore"]);
    }

    #[test]
    fn test_fit_on_one_to_five_leaves_top_rank_empty() {
        let input: Vec<SkillEntry> = (0..10)
            .map(|i| SkillEntry::new(format!("s{i}"), format!("Skill {i}"), 5))
            .collect();
        let fitted = fit_to_pyramid(&input, LadderType::OneToFive);
        assert!(fitted.iter().all(|e| e.rank != 5));
        assert_eq!(fitted[0].rank, 4);
        assert!(is_valid_distribution(&fitted, LadderType::OneToFive));
    }

    #[test]
    fn test_fit_repairs_short_inputs() {
        for n in 1..=6 {
            let input: Vec<SkillEntry> = (0..n)
                .map(|i| SkillEntry::new("", format!("Skill {i}"), 4))
                .collect();
            let fitted = fit_to_pyramid(&input, LadderType::OneToFour);
            assert_eq!(fitted.len(), n);
            assert!(is_valid_distribution(&fitted, LadderType::OneToFour), "n = {n}");
        }
    }

    #[test]
    fn test_fit_is_idempotent() {
        let input = named(&[("Fight", 2), ("Shoot", 1), ("Notice", 4)]);
        let once = fit_to_pyramid(&input, LadderType::OneToFour);
        let twice = fit_to_pyramid(&once, LadderType::OneToFour);
        assert_eq!(pairs(&once), pairs(&twice));
    }

    #[test]
    fn test_fit_assigns_fresh_slug_ids_and_clears_locks() {
        let input = vec![
            SkillEntry::new("x", "Fight", 1).with_locked(true),
            SkillEntry::new("y", "Sleight of Hand", 1).with_user_edited(true),
        ];
        let fitted = fit_to_pyramid(&input, LadderType::OneToFour);
        let ids: Vec<&str> = fitted.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["skill-fight", "skill-sleight-of-hand"]);
        assert!(fitted.iter().all(|e| !e.locked));
        assert!(fitted[1].user_edited);
    }

    #[test]
    fn test_refit_keeps_valid_ladder_when_switching_to_one_to_five() {
        let current = named(&[
            ("Fight", 4),
            ("Shoot", 3),
            ("Notice", 3),
            ("Athletics", 2),
            ("Drive", 2),
            ("Will", 2),
            ("Lore", 1),
            ("Crafts", 1),
            ("Rapport", 1),
            ("Stealth", 1),
            ("Empathy", 1),
        ]);
        let refit = refit_preserving(&current, LadderType::OneToFive, |e| e.locked);
        assert_eq!(refit.len(), current.len());
        assert!(is_valid_distribution(&refit, LadderType::OneToFive));
        assert_eq!(refit.iter().find(|e| e.name == "Fight").map(|e| e.rank), Some(4));
        assert_eq!(refit.iter().find(|e| e.name == "Fight").map(|e| e.id.as_str()), Some("skill-fight"));
    }

    #[test]
    fn test_refit_clamps_and_repairs_when_shrinking_ladder() {
        let current = named(&[("Fight", 5), ("Shoot", 4), ("Notice", 4), ("Will", 3), ("Lore", 3), ("Drive", 3)]);
        let refit = refit_preserving(&current, LadderType::OneToFour, |_| false);
        assert_eq!(refit.len(), 6);
        assert!(is_valid_distribution(&refit, LadderType::OneToFour));
    }

    #[test]
    fn test_refit_leaves_pinned_entry_off_a_shrunk_ladder() {
        let mut current = named(&[("Fight", 5), ("Shoot", 4), ("Notice", 3), ("Will", 2), ("Lore", 1)]);
        current[0].locked = true;
        let refit = refit_preserving(&current, LadderType::OneToFour, |e| e.locked);

        let fight = refit.iter().find(|e| e.name == "Fight");
        assert_eq!(fight.map(|e| (e.id.as_str(), e.rank, e.locked)), Some(("skill-fight", 5, true)));
        assert!(!is_valid_distribution(&refit, LadderType::OneToFour));
    }

    #[test]
    fn test_refit_never_moves_pinned_entries() {
        let mut current = named(&[("Fight", 4), ("Shoot", 1), ("Notice", 1), ("Will", 1)]);
        current[0].locked = true;
        let refit = refit_preserving(&current, LadderType::OneToFour, |e| e.locked);

        let fight = refit.iter().find(|e| e.name == "Fight");
        assert_eq!(fight.map(|e| (e.id.as_str(), e.rank)), Some(("skill-fight", 4)));
        assert!(is_valid_distribution(&refit, LadderType::OneToFour));
    }

    #[test]
    fn test_refit_is_best_effort_with_too_few_unpinned() {
        let current = vec![SkillEntry::new("skill-fight", "Fight", 4).with_locked(true)];
        let refit = refit_preserving(&current, LadderType::OneToFour, |e| e.locked);
        assert_eq!(refit, current);
        assert!(!is_valid_distribution(&refit, LadderType::OneToFour));
    }

    #[test]
    fn test_refit_prefers_pinned_over_unpinned_duplicates() {
        let current = vec![
            SkillEntry::new("skill-fight-2", "fight", 1),
            SkillEntry::new("skill-fight", "Fight", 1).with_user_edited(true),
        ];
        let refit = refit_preserving(&current, LadderType::OneToFour, |e| e.user_edited);
        assert_eq!(refit.len(), 1);
        assert_eq!(refit[0].id.as_str(), "skill-fight");
    }

    #[test]
    fn test_refit_gives_unpinned_blank_ids_slugs() {
        let current = vec![
            SkillEntry::new("skill-lore", "Lore", 1).with_locked(true),
            SkillEntry::new("", "Lore Keeping", 1),
            SkillEntry::new("skill-lore", "Ancient Lore", 1),
        ];
        let refit = refit_preserving(&current, LadderType::OneToFour, |e| e.locked);
        let ids: Vec<&str> = refit.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["skill-lore", "skill-lore-keeping", "skill-ancient-lore"]);
    }
}
