//! Generation Service - round trips to the generative backend
//!
//! A request is built from a snapshot of the sheet, sent with a per-mode
//! timeout and, once the await completes, applied to the store in one
//! operation. Failed, timed-out or cancelled requests leave the store as it
//! was. Only one request per control may be outstanding at a time.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashSet;
use tokio::sync::Mutex;

use fatesheet_domain::{CharacterState, MandatoryDescriptor};
use fatesheet_shared::{
    normalize_gm_hints, GenerationMode, GenerationRequest, GenerationResponse, GmHint, HintTarget,
};

use super::suggestion_merge::{
    ingest_skeleton, merge_descriptors, merge_skills, merge_stunts, DescriptorMerge, MergeReport,
    Merged,
};
use crate::ports::outbound::{GenerationError, GenerationPort};
use crate::state::SheetStore;

/// The UI control that triggers a request. Each control has at most one
/// request in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationControl {
    Skeleton,
    HighConcept,
    Trouble,
    Aspects,
    Skills,
    Stunts,
    SingleStunt,
    Hints,
}

impl GenerationControl {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skeleton => "skeleton",
            Self::HighConcept => "high_concept",
            Self::Trouble => "trouble",
            Self::Aspects => "aspects",
            Self::Skills => "skills",
            Self::Stunts => "stunts",
            Self::SingleStunt => "single_stunt",
            Self::Hints => "hints",
        }
    }
}

impl fmt::Display for GenerationControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&GenerationMode> for GenerationControl {
    fn from(mode: &GenerationMode) -> Self {
        match mode {
            GenerationMode::InitialSkeleton => Self::Skeleton,
            GenerationMode::RegenerateDescriptor {
                target: MandatoryDescriptor::HighConcept,
            } => Self::HighConcept,
            GenerationMode::RegenerateDescriptor {
                target: MandatoryDescriptor::Trouble,
            } => Self::Trouble,
            GenerationMode::ProposeDescriptors { .. } => Self::Aspects,
            GenerationMode::ProposeSkills => Self::Skills,
            GenerationMode::ProposeStunts { .. } => Self::Stunts,
            GenerationMode::SingleStunt { .. } => Self::SingleStunt,
            GenerationMode::GmHints { .. } => Self::Hints,
        }
    }
}

/// What a completed request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Suggestions were merged into the sheet.
    Applied(MergeReport),
    /// Hint cards for a target. The sheet is not changed.
    Hints { target: HintTarget, hints: Vec<GmHint> },
}

/// Removes its control from the in-flight set when dropped, including when
/// the request future is cancelled.
struct InFlightGuard {
    in_flight: Arc<DashSet<GenerationControl>>,
    control: GenerationControl,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.remove(&self.control);
    }
}

#[derive(Clone)]
pub struct GenerationService {
    port: Arc<dyn GenerationPort>,
    generation_timeout: Duration,
    hint_timeout: Duration,
    in_flight: Arc<DashSet<GenerationControl>>,
}

impl GenerationService {
    pub fn new(
        port: Arc<dyn GenerationPort>,
        generation_timeout: Duration,
        hint_timeout: Duration,
    ) -> Self {
        Self {
            port,
            generation_timeout,
            hint_timeout,
            in_flight: Arc::new(DashSet::new()),
        }
    }

    /// True while a request for `control` is outstanding; the UI disables the
    /// control meanwhile.
    pub fn is_in_flight(&self, control: GenerationControl) -> bool {
        self.in_flight.contains(&control)
    }

    fn begin(&self, control: GenerationControl) -> Result<InFlightGuard, GenerationError> {
        if !self.in_flight.insert(control) {
            return Err(GenerationError::AlreadyInFlight(control.as_str()));
        }
        Ok(InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
            control,
        })
    }

    fn timeout_for(&self, mode: &GenerationMode) -> Duration {
        match mode {
            GenerationMode::GmHints { .. } => self.hint_timeout,
            _ => self.generation_timeout,
        }
    }

    /// Send one request and wait for the decoded response.
    pub async fn request(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let control = GenerationControl::from(&request.mode);
        let _guard = self.begin(control)?;
        let timeout = self.timeout_for(&request.mode);

        tracing::info!(mode = request.mode.label(), "Generation requested");
        match tokio::time::timeout(timeout, self.port.generate(request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => {
                tracing::warn!(mode = request.mode.label(), error = %e, "Generation failed");
                Err(e)
            }
            Err(_) => {
                tracing::warn!(
                    mode = request.mode.label(),
                    timeout_secs = timeout.as_secs(),
                    "Generation timed out"
                );
                Err(GenerationError::Timeout {
                    mode: request.mode.label(),
                    seconds: timeout.as_secs(),
                })
            }
        }
    }

    /// Snapshot the sheet, run `mode` and apply the result.
    ///
    /// The store lock is released while the request is outstanding, so other
    /// edits can proceed; the response is merged against the state as it is
    /// when the response arrives.
    pub async fn generate(
        &self,
        store: &Mutex<SheetStore>,
        mode: GenerationMode,
        allow_overwrite_user_edits: bool,
    ) -> Result<GenerationOutcome, GenerationError> {
        let request = {
            let store = store.lock().await;
            GenerationRequest::new(mode, store.state()).allow_overwrite(allow_overwrite_user_edits)
        };

        let response = self.request(&request).await?;

        let mut store = store.lock().await;
        apply_response(&mut store, &request.mode, response, allow_overwrite_user_edits)
    }
}

/// Apply a decoded response for `mode` to the store, in one operation.
pub fn apply_response(
    store: &mut SheetStore,
    mode: &GenerationMode,
    response: GenerationResponse,
    allow_overwrite_user_edits: bool,
) -> Result<GenerationOutcome, GenerationError> {
    let ids = store.id_generator();
    let state: &CharacterState = store.state();
    let allow = allow_overwrite_user_edits;

    let merged: Merged = match (mode, response) {
        (GenerationMode::InitialSkeleton, GenerationResponse::Skeleton(skeleton)) => {
            ingest_skeleton(state, skeleton, allow)?
        }
        (GenerationMode::RegenerateDescriptor { target }, GenerationResponse::Remaining(r)) => {
            merge_descriptors(
                state,
                r.aspects.unwrap_or_default(),
                DescriptorMerge::Regenerate(*target),
                allow,
                ids.as_ref(),
            )
        }
        (GenerationMode::ProposeDescriptors { count }, GenerationResponse::Remaining(r)) => {
            merge_descriptors(
                state,
                r.aspects.unwrap_or_default(),
                DescriptorMerge::Propose {
                    limit: requested(*count),
                },
                allow,
                ids.as_ref(),
            )
        }
        (GenerationMode::ProposeSkills, GenerationResponse::Remaining(r)) => {
            merge_skills(state, r.skills.unwrap_or_default(), allow)?
        }
        (GenerationMode::ProposeStunts { count, .. }, GenerationResponse::Remaining(r)) => {
            merge_stunts(
                state,
                r.stunts.unwrap_or_default(),
                requested(*count),
                allow,
                ids.as_ref(),
            )
        }
        (GenerationMode::SingleStunt { .. }, GenerationResponse::Remaining(r)) => {
            merge_stunts(state, r.stunts.unwrap_or_default(), 1, allow, ids.as_ref())
        }
        (GenerationMode::GmHints { target, .. }, GenerationResponse::Hints(payload)) => {
            let hints = normalize_gm_hints(target, target.is_trouble(state), payload.hints);
            tracing::info!(target_id = %target.id, hints = hints.len(), "GM hints received");
            return Ok(GenerationOutcome::Hints {
                target: target.clone(),
                hints,
            });
        }
        (mode, _) => {
            return Err(GenerationError::InvalidResponse(format!(
                "response does not match {} request",
                mode.label()
            )));
        }
    };

    let report = merged.report;
    if !merged.is_empty() {
        store.replace_state(merged.replacement);
    }
    tracing::info!(
        mode = mode.label(),
        updated = report.updated,
        added = report.added,
        skipped = report.skipped,
        "Generation applied"
    );
    Ok(GenerationOutcome::Applied(report))
}

fn requested(count: Option<u32>) -> usize {
    count.map_or(1, |c| c.max(1) as usize)
}
