//! PlacementEngine - every ladder mutation goes through here
//!
//! The engine plans a move with the domain rules, commits the candidate via
//! `SheetStore::set_skills` when it is valid and reports the outcome. A
//! rejected move leaves the store untouched and sends no notification.

use fatesheet_domain::skill_ladder::{
    first_violation, is_valid_distribution, plan_place, plan_return_to_pool, refit_preserving,
    PlacementRejection, PlacementSource,
};
use fatesheet_domain::{PlacementOutcome, SkillEntry};

use crate::state::SheetStore;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlacementEngine;

impl PlacementEngine {
    pub fn new() -> Self {
        Self
    }

    /// Move `source` to `rank`: a pool name becomes a new entry, a ladder
    /// entry changes rank.
    pub fn place(&self, store: &mut SheetStore, source: &PlacementSource, rank: i32) -> PlacementOutcome {
        let state = store.state();
        let planned = plan_place(state.skills(), state.ladder_type(), source, rank);
        self.commit(store, planned, source, Some(rank))
    }

    /// Take a ladder entry off the ladder.
    pub fn return_to_pool(&self, store: &mut SheetStore, source: &PlacementSource) -> PlacementOutcome {
        let state = store.state();
        let planned = plan_return_to_pool(state.skills(), state.ladder_type(), source);
        self.commit(store, planned, source, None)
    }

    /// Reshape the current ladder for the active ladder type, e.g. after a
    /// ladder type switch. Locked entries stay put, and so do hand-edited ones
    /// unless `allow_overwrite_user_edits` is set. Returns false, leaving the
    /// store untouched, when the pinned entries make a valid ladder impossible.
    pub fn redistribute(&self, store: &mut SheetStore, allow_overwrite_user_edits: bool) -> bool {
        let state = store.state();
        let ladder = state.ladder_type();
        let refit = refit_preserving(state.skills(), ladder, |e| {
            is_pinned(e, allow_overwrite_user_edits)
        });

        if !is_valid_distribution(&refit, ladder) {
            tracing::warn!(
                ladder_type = %ladder,
                entries = refit.len(),
                violation = ?first_violation(&refit, ladder),
                "Pinned skills block redistribution"
            );
            return false;
        }

        tracing::info!(ladder_type = %ladder, entries = refit.len(), "Ladder redistributed");
        store.set_skills(refit);
        true
    }

    fn commit(
        &self,
        store: &mut SheetStore,
        planned: Result<Vec<SkillEntry>, PlacementRejection>,
        source: &PlacementSource,
        rank: Option<i32>,
    ) -> PlacementOutcome {
        match planned {
            Ok(candidate) => {
                tracing::info!(?source, ?rank, entries = candidate.len(), "Placement committed");
                store.set_skills(candidate);
                PlacementOutcome::Committed
            }
            Err(rejection) => {
                tracing::debug!(?source, ?rank, %rejection, "Placement rejected");
                PlacementOutcome::from(rejection)
            }
        }
    }
}

/// Entries generation and redistribution must not move.
pub fn is_pinned(entry: &SkillEntry, allow_overwrite_user_edits: bool) -> bool {
    entry.locked || (entry.user_edited && !allow_overwrite_user_edits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fatesheet_domain::{CharacterState, LadderType, SequentialIdGenerator};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn store_with(ladder: LadderType, skills: &[(&str, i32)]) -> SheetStore {
        let entries = skills
            .iter()
            .map(|(name, rank)| {
                SkillEntry::new(format!("skill-{}", name.to_lowercase()), *name, *rank)
            })
            .collect();
        let mut state = CharacterState::new().with_skills(entries);
        state.change_ladder_type(ladder);
        SheetStore::new(state, Arc::new(SequentialIdGenerator::new()))
    }

    fn names_at(store: &SheetStore, rank: i32) -> Vec<String> {
        store
            .state()
            .skills()
            .iter()
            .filter(|e| e.rank == rank)
            .map(|e| e.name.clone())
            .collect()
    }

    #[test]
    fn test_empty_ladder_only_accepts_lowest_rank() {
        let engine = PlacementEngine::new();
        let mut store = store_with(LadderType::OneToFour, &[]);

        let fight = PlacementSource::pool("Fight");
        assert_eq!(
            engine.place(&mut store, &fight, 3),
            PlacementOutcome::RejectedPyramidViolation
        );
        assert_eq!(
            engine.place(&mut store, &fight, 4),
            PlacementOutcome::RejectedPyramidViolation
        );
        assert_eq!(engine.place(&mut store, &fight, 1), PlacementOutcome::Committed);

        let entry = &store.state().skills()[0];
        assert_eq!(entry.id.as_str(), "skill-fight");
        assert!(entry.user_edited);
    }

    #[test]
    fn test_place_from_pool_on_balanced_ladder() {
        let engine = PlacementEngine::new();
        let mut store = store_with(
            LadderType::OneToFour,
            &[("Fight", 4), ("Shoot", 3), ("Notice", 3), ("Athletics", 2), ("Will", 2), ("Lore", 1), ("Craft", 1)],
        );

        let outcome = engine.place(&mut store, &PlacementSource::pool("Drive"), 2);

        assert_eq!(outcome, PlacementOutcome::Committed);
        assert_eq!(names_at(&store, 2), vec!["Athletics", "Will", "Drive"]);
    }

    #[test]
    fn test_duplicate_and_locked_rejections_leave_store_untouched() {
        let engine = PlacementEngine::new();
        let mut store = store_with(LadderType::OneToFour, &[("Fight", 1)]);
        store.toggle_skill_lock("skill-fight");
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&notified);
        store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let before = store.snapshot();

        assert_eq!(
            engine.place(&mut store, &PlacementSource::pool(" fight "), 1),
            PlacementOutcome::RejectedDuplicate
        );
        assert_eq!(
            engine.place(&mut store, &PlacementSource::ladder("skill-fight"), 2),
            PlacementOutcome::RejectedLocked
        );
        assert_eq!(
            engine.return_to_pool(&mut store, &PlacementSource::ladder("skill-fight")),
            PlacementOutcome::RejectedLocked
        );

        assert_eq!(store.state(), &before);
        assert_eq!(notified.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_return_to_pool() {
        let engine = PlacementEngine::new();
        let mut store = store_with(LadderType::OneToFour, &[("Fight", 2), ("Shoot", 1), ("Lore", 1)]);

        assert_eq!(
            engine.return_to_pool(&mut store, &PlacementSource::pool("Fight")),
            PlacementOutcome::RejectedPyramidViolation
        );
        assert_eq!(
            engine.return_to_pool(&mut store, &PlacementSource::ladder("skill-shoot")),
            PlacementOutcome::Committed
        );
        assert!(store.state().pool().contains(&"Shoot".to_string()));
    }

    #[test]
    fn test_return_that_would_break_pyramid_is_rejected() {
        let engine = PlacementEngine::new();
        let mut store = store_with(LadderType::OneToFour, &[("Fight", 3), ("Shoot", 2), ("Lore", 1)]);

        let outcome = engine.return_to_pool(&mut store, &PlacementSource::ladder("skill-shoot"));

        assert_eq!(outcome, PlacementOutcome::RejectedPyramidViolation);
        assert_eq!(store.state().skills().len(), 3);
    }

    #[test]
    fn test_unknown_rank_is_rejected_not_panicking() {
        let engine = PlacementEngine::new();
        let mut store = store_with(LadderType::OneToFour, &[("Fight", 1)]);

        assert_eq!(
            engine.place(&mut store, &PlacementSource::pool("Shoot"), 5),
            PlacementOutcome::RejectedPyramidViolation
        );
        assert_eq!(
            engine.place(&mut store, &PlacementSource::ladder("skill-missing"), 1),
            PlacementOutcome::RejectedLocked
        );
    }

    #[test]
    fn test_ladder_switch_then_redistribute_keeps_every_entry() {
        let engine = PlacementEngine::new();
        let mut store = store_with(
            LadderType::OneToFour,
            &[("Fight", 4), ("Shoot", 3), ("Notice", 3), ("Will", 2), ("Lore", 2), ("Craft", 2), ("Drive", 1)],
        );
        let before = store.state().skills().to_vec();

        store.change_ladder_type(LadderType::OneToFive);
        assert_eq!(store.state().skills(), before.as_slice());

        assert!(engine.redistribute(&mut store, false));
        let after = store.state().skills();
        assert_eq!(after.len(), before.len());
        assert!(is_valid_distribution(after, LadderType::OneToFive));
    }

    #[test]
    fn test_redistribute_after_shrinking_ladder() {
        let engine = PlacementEngine::new();
        let mut store = store_with(
            LadderType::OneToFive,
            &[("Fight", 5), ("Shoot", 4), ("Notice", 3), ("Will", 2), ("Lore", 1)],
        );

        store.change_ladder_type(LadderType::OneToFour);
        assert!(engine.redistribute(&mut store, true));

        let after = store.state().skills();
        assert_eq!(after.len(), 5);
        assert!(after.iter().all(|e| LadderType::OneToFour.contains_rank(e.rank)));
        assert!(is_valid_distribution(after, LadderType::OneToFour));
    }

    #[test]
    fn test_pinned_entries_can_block_redistribution() {
        let engine = PlacementEngine::new();
        let mut store = store_with(LadderType::OneToFour, &[("Fight", 4), ("Shoot", 4)]);
        store.toggle_skill_lock("skill-fight");
        store.toggle_skill_lock("skill-shoot");
        let before = store.snapshot();

        assert!(!engine.redistribute(&mut store, true));
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_locked_skill_off_a_shrunk_ladder_blocks_redistribution() {
        let engine = PlacementEngine::new();
        let mut store = store_with(
            LadderType::OneToFive,
            &[("Fight", 5), ("Shoot", 4), ("Notice", 3), ("Will", 2), ("Lore", 1)],
        );
        store.toggle_skill_lock("skill-fight");
        store.change_ladder_type(LadderType::OneToFour);
        let before = store.snapshot();

        assert!(!engine.redistribute(&mut store, true));
        assert_eq!(store.state(), &before);
        let fight = store.state().skill("skill-fight");
        assert_eq!(fight.map(|e| (e.rank, e.locked)), Some((5, true)));
    }

    #[test]
    fn test_is_pinned() {
        let plain = SkillEntry::new("skill-fight", "Fight", 1);
        let edited = plain.clone().with_user_edited(true);
        let locked = plain.clone().with_locked(true);

        assert!(!is_pinned(&plain, false));
        assert!(is_pinned(&edited, false));
        assert!(!is_pinned(&edited, true));
        assert!(is_pinned(&locked, true));
    }
}
