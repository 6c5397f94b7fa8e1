//! Continuous placement: drag a chip, drop it on a rank or the pool.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use fatesheet_domain::PlacementOutcome;

use super::{apply_move, ChipRef, DropTarget, FrontEndKind, PlacementFrontEnd};
use crate::application::PlacementEngine;
use crate::ports::outbound::{ClockPort, FeedbackLevel, FeedbackPort};
use crate::state::SheetStore;

/// How long a target stays flagged after a rejected drop.
pub const REJECTION_FLAG_MS: i64 = 500;

pub struct PointerDragFrontEnd {
    engine: PlacementEngine,
    clock: Arc<dyn ClockPort>,
    feedback: Option<Arc<dyn FeedbackPort>>,
    dragging: Option<ChipRef>,
    flagged: Option<(DropTarget, DateTime<Utc>)>,
}

impl PointerDragFrontEnd {
    pub fn new(clock: Arc<dyn ClockPort>, feedback: Option<Arc<dyn FeedbackPort>>) -> Self {
        Self {
            engine: PlacementEngine::new(),
            clock,
            feedback,
            dragging: None,
            flagged: None,
        }
    }

    /// Chip being dragged, if any.
    pub fn dragging(&self) -> Option<&ChipRef> {
        self.dragging.as_ref()
    }

    /// Target to render with the rejection style, until the flag expires.
    pub fn flagged_target(&self) -> Option<DropTarget> {
        let (target, until) = self.flagged?;
        (self.clock.now() < until).then_some(target)
    }

    fn flag_rejection(&mut self, target: DropTarget, outcome: PlacementOutcome) {
        let until = self.clock.now() + Duration::milliseconds(REJECTION_FLAG_MS);
        self.flagged = Some((target, until));
        if let (Some(feedback), Some(message)) = (&self.feedback, outcome.message()) {
            feedback.notify(FeedbackLevel::Warning, message);
        }
    }
}

impl PlacementFrontEnd for PointerDragFrontEnd {
    fn kind(&self) -> FrontEndKind {
        FrontEndKind::PointerDrag
    }

    fn on_chip(&mut self, chip: ChipRef) {
        self.dragging = Some(chip);
    }

    fn on_target(&mut self, store: &mut SheetStore, target: DropTarget) -> Option<PlacementOutcome> {
        // A drop always ends the drag.
        let chip = self.dragging.take()?;
        let outcome = apply_move(&self.engine, store, &chip, target)?;
        if !outcome.is_committed() {
            self.flag_rejection(target, outcome);
        }
        Some(outcome)
    }

    fn clear(&mut self) {
        self.dragging = None;
    }
}
