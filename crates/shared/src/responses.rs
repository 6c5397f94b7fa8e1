//! Generation response payloads.
//!
//! Suggestions carry an `id` when they update an existing item and omit it
//! for new items. Nothing here is trusted: the player runs every suggestion
//! through the domain setters before it touches state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hints::RawGmHint;

/// Response body could not be decoded for the requested mode.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid response body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedSkill {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub rank: i32,
}

/// `/api/generate_skeleton` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkeletonResponse {
    pub high_concept: String,
    pub trouble: String,
    #[serde(default)]
    pub skills: Vec<RankedSkill>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectSuggestion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSuggestion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rank: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StuntSuggestion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// `/api/generate_remaining` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingResponse {
    #[serde(default)]
    pub aspects: Option<Vec<AspectSuggestion>>,
    #[serde(default)]
    pub skills: Option<Vec<SkillSuggestion>>,
    #[serde(default)]
    pub stunts: Option<Vec<StuntSuggestion>>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// `/api/hints` response before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GmHintsPayload {
    #[serde(default)]
    pub hints: Vec<RawGmHint>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFieldError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictField {
    pub field: String,
    #[serde(default)]
    pub current_value: Option<serde_json::Value>,
    #[serde(default)]
    pub proposed_value: Option<serde_json::Value>,
    pub reason: String,
}

/// Error body the backend sends with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub validation_errors: Option<Vec<ValidationFieldError>>,
    #[serde(default)]
    pub conflicts: Option<Vec<ConflictField>>,
}

/// Decoded response, one variant per endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResponse {
    Skeleton(SkeletonResponse),
    Remaining(RemainingResponse),
    Hints(GmHintsPayload),
}
