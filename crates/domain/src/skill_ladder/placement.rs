//! Placement planning: turn a proposed move into a candidate ladder or a
//! rejection. Nothing here mutates state; the caller commits the candidate.

use serde::{Deserialize, Serialize};

use super::constraint::is_valid_distribution;
use crate::common::name_key;
use crate::entities::SkillEntry;
use crate::ids::{skill_id_for, SkillEntryId};
use crate::value_objects::LadderType;

/// Where a dragged or selected chip comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum PlacementSource {
    Pool { name: String },
    Ladder { id: SkillEntryId },
}

impl PlacementSource {
    pub fn pool(name: impl Into<String>) -> Self {
        Self::Pool { name: name.into() }
    }

    pub fn ladder(id: impl Into<SkillEntryId>) -> Self {
        Self::Ladder { id: id.into() }
    }
}

/// Result of a placement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementOutcome {
    Committed,
    RejectedLocked,
    RejectedDuplicate,
    RejectedPyramidViolation,
}

impl PlacementOutcome {
    pub fn is_committed(self) -> bool {
        matches!(self, Self::Committed)
    }

    /// Short user-facing text for rejections.
    pub fn message(self) -> Option<&'static str> {
        match self {
            Self::Committed => None,
            Self::RejectedLocked => Some("That skill is locked."),
            Self::RejectedDuplicate => Some("That skill is already on the ladder."),
            Self::RejectedPyramidViolation => {
                Some("Each rank needs at least as many skills as the rank above it.")
            }
        }
    }
}

/// Reason a move cannot be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlacementRejection {
    #[error("skill is locked or not on the ladder")]
    Locked,
    #[error("skill name already on the ladder")]
    Duplicate,
    #[error("move breaks the pyramid or is malformed")]
    PyramidViolation,
}

impl From<PlacementRejection> for PlacementOutcome {
    fn from(rejection: PlacementRejection) -> Self {
        match rejection {
            PlacementRejection::Locked => Self::RejectedLocked,
            PlacementRejection::Duplicate => Self::RejectedDuplicate,
            PlacementRejection::PyramidViolation => Self::RejectedPyramidViolation,
        }
    }
}

/// Candidate ladder for moving `source` to `rank`.
///
/// Pool entries are appended with a slug identity and `user_edited` set;
/// ladder entries keep their identity and change rank in place.
pub fn plan_place(
    current: &[SkillEntry],
    ladder: LadderType,
    source: &PlacementSource,
    rank: i32,
) -> Result<Vec<SkillEntry>, PlacementRejection> {
    let candidate = match source {
        PlacementSource::Ladder { id } => {
            let index = movable_index(current, id)?;
            if !ladder.contains_rank(rank) {
                return Err(PlacementRejection::PyramidViolation);
            }
            let mut candidate = current.to_vec();
            candidate[index].rank = rank;
            candidate[index].user_edited = true;
            candidate
        }
        PlacementSource::Pool { name } => {
            let name = name.trim();
            if name.is_empty() || !ladder.contains_rank(rank) {
                return Err(PlacementRejection::PyramidViolation);
            }
            let key = name_key(name);
            if current.iter().any(|e| e.name_key() == key) {
                return Err(PlacementRejection::Duplicate);
            }
            let id = skill_id_for(name, |c| current.iter().any(|e| e.id.as_str() == c));
            let mut candidate = current.to_vec();
            candidate.push(SkillEntry::new(id, name, rank).with_user_edited(true));
            candidate
        }
    };

    if is_valid_distribution(&candidate, ladder) {
        Ok(candidate)
    } else {
        Err(PlacementRejection::PyramidViolation)
    }
}

/// Candidate ladder with the entry removed. Only ladder-origin sources can be
/// returned; the result is validated like any other move because emptying a
/// rank can leave the rank above it top-heavy.
pub fn plan_return_to_pool(
    current: &[SkillEntry],
    ladder: LadderType,
    source: &PlacementSource,
) -> Result<Vec<SkillEntry>, PlacementRejection> {
    let id = match source {
        PlacementSource::Ladder { id } => id,
        PlacementSource::Pool { .. } => return Err(PlacementRejection::PyramidViolation),
    };
    let index = movable_index(current, id)?;

    let mut candidate = current.to_vec();
    candidate.remove(index);

    if is_valid_distribution(&candidate, ladder) {
        Ok(candidate)
    } else {
        Err(PlacementRejection::PyramidViolation)
    }
}

fn movable_index(current: &[SkillEntry], id: &SkillEntryId) -> Result<usize, PlacementRejection> {
    match current.iter().position(|e| &e.id == id) {
        Some(index) if !current[index].locked => Ok(index),
        _ => Err(PlacementRejection::Locked),
    }
}
