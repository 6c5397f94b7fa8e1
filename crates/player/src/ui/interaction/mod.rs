//! Placement front-ends
//!
//! Two ways to move skills between the pool and the ladder, behind one
//! capability trait. The mode is chosen once at startup and every resulting
//! move goes through `PlacementEngine`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use fatesheet_domain::common::name_key;
use fatesheet_domain::{PlacementOutcome, PlacementSource, SkillEntry, SkillEntryId};

use crate::ports::outbound::{ClockPort, FeedbackPort};
use crate::state::SheetStore;

mod pointer;
mod tap;

pub use pointer::{PointerDragFrontEnd, REJECTION_FLAG_MS};
pub use tap::TapToPlaceFrontEnd;

/// Configured interaction mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Decide from the environment's pointer capabilities.
    #[default]
    Auto,
    Pointer,
    Tap,
}

impl InteractionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Pointer => "pointer",
            Self::Tap => "tap",
        }
    }

    /// Explicit modes win; `Auto` picks tap-to-place for a pointer-only
    /// environment (coarse pointer, no hover) and drag-and-drop otherwise.
    pub fn resolve(self, pointer_only: bool) -> FrontEndKind {
        match self {
            Self::Pointer => FrontEndKind::PointerDrag,
            Self::Tap => FrontEndKind::TapToPlace,
            Self::Auto if pointer_only => FrontEndKind::TapToPlace,
            Self::Auto => FrontEndKind::PointerDrag,
        }
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownInteractionMode(pub String);

impl fmt::Display for UnknownInteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown interaction mode: {}", self.0)
    }
}

impl std::error::Error for UnknownInteractionMode {}

impl FromStr for InteractionMode {
    type Err = UnknownInteractionMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "pointer" => Ok(Self::Pointer),
            "tap" => Ok(Self::Tap),
            other => Err(UnknownInteractionMode(other.to_string())),
        }
    }
}

/// Concrete front-end after mode resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrontEndKind {
    /// Continuous: drag a chip and drop it on a target.
    PointerDrag,
    /// Discrete: tap a chip, then tap a target.
    TapToPlace,
}

/// Where a chip currently lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChipOrigin {
    Pool,
    Ladder,
}

/// A skill chip as the UI sees it. Mirrors the drag payload
/// `{origin, id?, name, rank?}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChipRef {
    pub origin: ChipOrigin,
    pub id: Option<SkillEntryId>,
    pub name: String,
    pub rank: Option<i32>,
}

impl ChipRef {
    pub fn pool(name: impl Into<String>) -> Self {
        Self {
            origin: ChipOrigin::Pool,
            id: None,
            name: name.into(),
            rank: None,
        }
    }

    pub fn ladder(entry: &SkillEntry) -> Self {
        Self {
            origin: ChipOrigin::Ladder,
            id: Some(entry.id.clone()),
            name: entry.name.clone(),
            rank: Some(entry.rank),
        }
    }

    /// Placement source for this chip. `None` for a ladder chip without an id.
    pub fn source(&self) -> Option<PlacementSource> {
        match (self.origin, &self.id) {
            (ChipOrigin::Pool, _) => Some(PlacementSource::pool(self.name.clone())),
            (ChipOrigin::Ladder, Some(id)) => Some(PlacementSource::ladder(id.clone())),
            (ChipOrigin::Ladder, None) => None,
        }
    }

    /// Same chip regardless of its rank: ladder chips by id, pool chips by name.
    pub fn same_chip(&self, other: &ChipRef) -> bool {
        match (self.origin, other.origin) {
            (ChipOrigin::Ladder, ChipOrigin::Ladder) => self.id == other.id,
            (ChipOrigin::Pool, ChipOrigin::Pool) => name_key(&self.name) == name_key(&other.name),
            _ => false,
        }
    }
}

/// A drop or tap target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropTarget {
    Rank(i32),
    Pool,
}

/// Turns chip and target events into placement moves.
pub trait PlacementFrontEnd: Send {
    fn kind(&self) -> FrontEndKind;

    /// A chip was grabbed (pointer) or tapped (tap).
    fn on_chip(&mut self, chip: ChipRef);

    /// A target received the chip. Returns the outcome when a move was
    /// attempted, `None` when the event was ignored.
    fn on_target(&mut self, store: &mut SheetStore, target: DropTarget) -> Option<PlacementOutcome>;

    /// Abandon the gesture in progress.
    fn clear(&mut self);
}

/// Build the front-end for the configured mode.
pub fn create_front_end(
    mode: InteractionMode,
    pointer_only: bool,
    clock: Arc<dyn ClockPort>,
    feedback: Option<Arc<dyn FeedbackPort>>,
) -> Box<dyn PlacementFrontEnd> {
    let kind = mode.resolve(pointer_only);
    tracing::info!(mode = %mode, pointer_only, ?kind, "Interaction front-end selected");
    match kind {
        FrontEndKind::PointerDrag => Box::new(PointerDragFrontEnd::new(clock, feedback)),
        FrontEndKind::TapToPlace => Box::new(TapToPlaceFrontEnd::new()),
    }
}

/// Shared dispatch: a chip meeting a target becomes `place` or
/// `return_to_pool`. Pool chips dropped on the pool are not a move.
fn apply_move(
    engine: &crate::application::PlacementEngine,
    store: &mut SheetStore,
    chip: &ChipRef,
    target: DropTarget,
) -> Option<PlacementOutcome> {
    let source = chip.source()?;
    match (target, chip.origin) {
        (DropTarget::Pool, ChipOrigin::Pool) => None,
        (DropTarget::Pool, ChipOrigin::Ladder) => Some(engine.return_to_pool(store, &source)),
        (DropTarget::Rank(rank), _) => Some(engine.place(store, &source, rank)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::MockClockPort;

    #[test]
    fn test_mode_parsing() {
        assert_eq!(" Tap ".parse::<InteractionMode>(), Ok(InteractionMode::Tap));
        assert_eq!("POINTER".parse::<InteractionMode>(), Ok(InteractionMode::Pointer));
        assert_eq!("auto".parse::<InteractionMode>(), Ok(InteractionMode::Auto));
        assert!("mouse".parse::<InteractionMode>().is_err());
    }

    #[test]
    fn test_explicit_mode_wins_over_capabilities() {
        assert_eq!(InteractionMode::Pointer.resolve(true), FrontEndKind::PointerDrag);
        assert_eq!(InteractionMode::Tap.resolve(false), FrontEndKind::TapToPlace);
    }

    #[test]
    fn test_auto_follows_pointer_capability() {
        assert_eq!(InteractionMode::Auto.resolve(true), FrontEndKind::TapToPlace);
        assert_eq!(InteractionMode::Auto.resolve(false), FrontEndKind::PointerDrag);
    }

    #[test]
    fn test_factory_builds_resolved_kind() {
        let clock: Arc<dyn ClockPort> = Arc::new(MockClockPort::new());
        let front = create_front_end(InteractionMode::Auto, true, Arc::clone(&clock), None);
        assert_eq!(front.kind(), FrontEndKind::TapToPlace);

        let front = create_front_end(InteractionMode::Auto, false, clock, None);
        assert_eq!(front.kind(), FrontEndKind::PointerDrag);
    }

    #[test]
    fn test_chip_identity() {
        let entry = SkillEntry::new("skill-fight", "Fight", 3);
        let on_ladder = ChipRef::ladder(&entry);
        let moved = ChipRef {
            rank: Some(2),
            ..on_ladder.clone()
        };
        assert!(on_ladder.same_chip(&moved));
        assert!(ChipRef::pool("fight").same_chip(&ChipRef::pool("Fight")));
        assert!(!ChipRef::pool("Fight").same_chip(&on_ladder));
        assert_eq!(
            on_ladder.source(),
            Some(PlacementSource::ladder("skill-fight"))
        );
    }

    #[test]
    fn test_pool_chips_match_by_trimmed_unicode_name() {
        assert!(ChipRef::pool(" Éclat ").same_chip(&ChipRef::pool("éclat")));
        assert!(ChipRef::pool("Lore ").same_chip(&ChipRef::pool("LORE")));
        assert!(!ChipRef::pool("Lore").same_chip(&ChipRef::pool("Lore Keeping")));
    }
}
