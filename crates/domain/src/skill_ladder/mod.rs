//! Skill ladder rules: the pyramid constraint, placement planning and
//! redistribution.
//!
//! Everything here is pure. Callers hold the state and commit candidates
//! returned from these functions.

pub mod constraint;
pub mod placement;
pub mod redistribution;

pub use constraint::{
    checked_pairs, counts_by_rank, first_violation, is_valid_distribution, ranks_for,
    PyramidViolation,
};
pub use placement::{
    plan_place, plan_return_to_pool, PlacementOutcome, PlacementRejection, PlacementSource,
};
pub use redistribution::{fit_to_pyramid, refit_preserving, LOWEST_RANK_CAP};
