//! Discrete placement: tap a chip to select it, then tap a target.

use fatesheet_domain::PlacementOutcome;

use super::{apply_move, ChipRef, DropTarget, FrontEndKind, PlacementFrontEnd};
use crate::application::PlacementEngine;
use crate::state::SheetStore;

#[derive(Debug, Default)]
pub struct TapToPlaceFrontEnd {
    engine: PlacementEngine,
    selected: Option<ChipRef>,
}

impl TapToPlaceFrontEnd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected chip, rendered highlighted.
    pub fn selected(&self) -> Option<&ChipRef> {
        self.selected.as_ref()
    }
}

impl PlacementFrontEnd for TapToPlaceFrontEnd {
    fn kind(&self) -> FrontEndKind {
        FrontEndKind::TapToPlace
    }

    fn on_chip(&mut self, chip: ChipRef) {
        match &self.selected {
            Some(current) if current.same_chip(&chip) => self.selected = None,
            _ => self.selected = Some(chip),
        }
    }

    fn on_target(&mut self, store: &mut SheetStore, target: DropTarget) -> Option<PlacementOutcome> {
        let chip = self.selected.take()?;
        let outcome = apply_move(&self.engine, store, &chip, target);
        if let Some(outcome) = outcome.filter(|o| !o.is_committed()) {
            tracing::debug!(chip = %chip.name, ?target, ?outcome, "Tap placement rejected");
        }
        outcome
    }

    fn clear(&mut self) {
        self.selected = None;
    }
}
