//! Generation requests.
//!
//! Every backend call is one `GenerationMode`. The mode decides the endpoint,
//! the request body and how the response is parsed, so an impossible pairing
//! (hint options on a skeleton call, for example) cannot be built.

use serde::{Deserialize, Serialize};

use fatesheet_domain::{CharacterState, MandatoryDescriptor};

use crate::character::CharacterPayload;
use crate::hints::HintTarget;
use crate::responses::{
    GenerationResponse, GmHintsPayload, ProtocolError, RemainingResponse, SkeletonResponse,
};

pub const SKELETON_ENDPOINT: &str = "/api/generate_skeleton";
pub const REMAINING_ENDPOINT: &str = "/api/generate_remaining";
pub const HINTS_ENDPOINT: &str = "/api/hints";

/// Action a proposed stunt should improve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StuntActionType {
    Overcome,
    CreateAdvantage,
    Attack,
    Defend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintTone {
    #[default]
    Neutral,
    Cinematic,
}

/// Scoping for stunt proposals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StuntScope {
    pub target_skill_id: Option<String>,
    pub action_type: Option<StuntActionType>,
    pub note: Option<String>,
}

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationMode {
    /// High Concept, Trouble and a first ladder from idea and setting.
    InitialSkeleton,
    /// New text for one of the mandatory descriptors.
    RegenerateDescriptor { target: MandatoryDescriptor },
    /// Additional descriptors.
    ProposeDescriptors { count: Option<u32> },
    /// A full skill ladder proposal.
    ProposeSkills,
    /// A batch of stunts.
    ProposeStunts { count: Option<u32>, scope: StuntScope },
    /// One stunt.
    SingleStunt { scope: StuntScope },
    /// GM hint cards for a descriptor or ability.
    GmHints { target: HintTarget, tone: Option<HintTone> },
}

/// Remaining-endpoint mode literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainingMode {
    Aspects,
    Stunts,
    SingleStunt,
    Skills,
    HighConcept,
    Trouble,
}

impl From<MandatoryDescriptor> for RemainingMode {
    fn from(target: MandatoryDescriptor) -> Self {
        match target {
            MandatoryDescriptor::HighConcept => Self::HighConcept,
            MandatoryDescriptor::Trouble => Self::Trouble,
        }
    }
}

impl GenerationMode {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::InitialSkeleton => SKELETON_ENDPOINT,
            Self::GmHints { .. } => HINTS_ENDPOINT,
            _ => REMAINING_ENDPOINT,
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InitialSkeleton => "skeleton",
            Self::RegenerateDescriptor {
                target: MandatoryDescriptor::HighConcept,
            } => "high_concept",
            Self::RegenerateDescriptor {
                target: MandatoryDescriptor::Trouble,
            } => "trouble",
            Self::ProposeDescriptors { .. } => "aspects",
            Self::ProposeSkills => "skills",
            Self::ProposeStunts { .. } => "stunts",
            Self::SingleStunt { .. } => "single_stunt",
            Self::GmHints { .. } => "hints",
        }
    }

    /// Parse a response body for this mode.
    pub fn parse_response(&self, body: &str) -> Result<GenerationResponse, ProtocolError> {
        let response = match self {
            Self::InitialSkeleton => {
                GenerationResponse::Skeleton(serde_json::from_str::<SkeletonResponse>(body)?)
            }
            Self::GmHints { .. } => {
                GenerationResponse::Hints(serde_json::from_str::<GmHintsPayload>(body)?)
            }
            _ => GenerationResponse::Remaining(serde_json::from_str::<RemainingResponse>(body)?),
        };
        Ok(response)
    }
}

// =============================================================================
// Wire bodies
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkeletonRequestBody {
    pub idea: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_list: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainingOptions {
    pub mode: RemainingMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_skill_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_type: Option<StuntActionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_bank: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainingRequestBody {
    pub character: CharacterPayload,
    pub allow_overwrite_user_edits: bool,
    pub options: RemainingOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<HintTone>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintsRequestBody {
    pub character: CharacterPayload,
    pub target: HintTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<HintOptions>,
}

/// Body of any generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestBody {
    Skeleton(SkeletonRequestBody),
    Remaining(RemainingRequestBody),
    Hints(HintsRequestBody),
}

/// A complete generation call: mode plus the state it was issued against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub mode: GenerationMode,
    pub character: CharacterPayload,
    pub allow_overwrite_user_edits: bool,
}

impl GenerationRequest {
    pub fn new(mode: GenerationMode, state: &CharacterState) -> Self {
        Self {
            mode,
            character: CharacterPayload::from(state),
            allow_overwrite_user_edits: false,
        }
    }

    pub fn allow_overwrite(mut self, allow: bool) -> Self {
        self.allow_overwrite_user_edits = allow;
        self
    }

    pub fn endpoint(&self) -> &'static str {
        self.mode.endpoint()
    }

    pub fn body(&self) -> RequestBody {
        let remaining = |mode: RemainingMode, count: Option<u32>, scope: Option<&StuntScope>| {
            RequestBody::Remaining(RemainingRequestBody {
                character: self.character.clone(),
                allow_overwrite_user_edits: self.allow_overwrite_user_edits,
                options: RemainingOptions {
                    mode,
                    count,
                    target_skill_id: scope.and_then(|s| s.target_skill_id.clone()),
                    action_type: scope.and_then(|s| s.action_type),
                    note: scope.and_then(|s| s.note.clone()),
                    skill_bank: self.character.meta.skill_bank.clone(),
                },
            })
        };

        match &self.mode {
            GenerationMode::InitialSkeleton => RequestBody::Skeleton(SkeletonRequestBody {
                idea: self.character.meta.idea.clone(),
                setting: self.character.meta.setting.clone(),
                skill_list: self.character.meta.skill_bank.clone(),
            }),
            GenerationMode::GmHints { target, tone } => RequestBody::Hints(HintsRequestBody {
                character: self.character.clone(),
                target: target.clone(),
                options: tone.map(|tone| HintOptions {
                    num: None,
                    tone: Some(tone),
                }),
            }),
            GenerationMode::ProposeDescriptors { count } => {
                remaining(RemainingMode::Aspects, *count, None)
            }
            GenerationMode::ProposeStunts { count, scope } => {
                remaining(RemainingMode::Stunts, *count, Some(scope))
            }
            GenerationMode::SingleStunt { scope } => {
                remaining(RemainingMode::SingleStunt, Some(1), Some(scope))
            }
            GenerationMode::RegenerateDescriptor { target } => {
                remaining(RemainingMode::from(*target), None, None)
            }
            GenerationMode::ProposeSkills => remaining(RemainingMode::Skills, None, None),
        }
    }
}
