//! User-interaction layer. Rendering lives outside this crate; what remains
//! here is the input protocol that turns chip and target events into moves.

pub mod interaction;

pub use interaction::{
    create_front_end, ChipOrigin, ChipRef, DropTarget, FrontEndKind, InteractionMode,
    PlacementFrontEnd, PointerDragFrontEnd, TapToPlaceFrontEnd,
};
