//! FateSheet Protocol - Wire contracts with the generation backend
//!
//! This crate contains the types exchanged with the backend:
//! - Character payloads and their conversions to and from the domain
//! - Generation requests, one mode per backend call
//! - Response payloads, including GM hint normalization
//!
//! # Design Principles
//!
//! 1. **Tolerant decoding** - every optional wire field is `Option`
//! 2. **Validate at the boundary** - malformed items are dropped on conversion
//! 3. **No state** - pure data types and conversions

pub mod character;
pub mod hints;
pub mod requests;
pub mod responses;

pub use character::{AspectPayload, CharacterPayload, MetaPayload, SkillPayload, StuntPayload};
pub use hints::{normalize_gm_hints, GmHint, HintKind, HintTarget, HintTargetKind, RawGmHint};
pub use requests::{
    GenerationMode, GenerationRequest, HintTone, RemainingMode, RequestBody, StuntActionType,
    StuntScope, HINTS_ENDPOINT, REMAINING_ENDPOINT, SKELETON_ENDPOINT,
};
pub use responses::{
    AspectSuggestion, GenerationErrorResponse, GenerationResponse, GmHintsPayload, ProtocolError,
    RankedSkill, RemainingResponse, SkeletonResponse, SkillSuggestion, StuntSuggestion,
};
