//! GM hint cards and their boundary normalization.
//!
//! The backend returns loosely typed cards. `normalize_gm_hints` turns them
//! into a fixed shape per target: three cards for a stunt, a compel plus a
//! player invoke for the Trouble, and one player invoke for any other aspect.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use fatesheet_domain::{CharacterState, TROUBLE_ID};

/// Card category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintKind {
    Invoke,
    Compel,
    CreateAdvantage,
    PlayerInvoke,
    Trigger,
    EdgeCase,
    Synergy,
}

impl HintKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invoke => "invoke",
            Self::Compel => "compel",
            Self::CreateAdvantage => "create_advantage",
            Self::PlayerInvoke => "player_invoke",
            Self::Trigger => "trigger",
            Self::EdgeCase => "edge_case",
            Self::Synergy => "synergy",
        }
    }

    /// Parse a raw type, accepting the short aliases `ca`, `player` and `gm`.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "invoke" => Some(Self::Invoke),
            "compel" | "gm" => Some(Self::Compel),
            "create_advantage" | "ca" => Some(Self::CreateAdvantage),
            "player_invoke" | "player" => Some(Self::PlayerInvoke),
            "trigger" => Some(Self::Trigger),
            "edge_case" => Some(Self::EdgeCase),
            "synergy" => Some(Self::Synergy),
            _ => None,
        }
    }

    fn default_title(self) -> &'static str {
        match self {
            Self::Invoke => "Invoke",
            Self::Compel => "Compel",
            Self::CreateAdvantage => "Create Advantage",
            Self::PlayerInvoke => "Player Invoke",
            Self::Trigger => "Trigger",
            Self::EdgeCase => "Edge Case",
            Self::Synergy => "Synergy",
        }
    }
}

impl fmt::Display for HintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a hint request is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintTargetKind {
    Aspect,
    Stunt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintTarget {
    #[serde(rename = "type")]
    pub kind: HintTargetKind,
    pub id: String,
}

impl HintTarget {
    pub fn aspect(id: impl Into<String>) -> Self {
        Self {
            kind: HintTargetKind::Aspect,
            id: id.into(),
        }
    }

    pub fn stunt(id: impl Into<String>) -> Self {
        Self {
            kind: HintTargetKind::Stunt,
            id: id.into(),
        }
    }

    /// True when the target is the character's Trouble, by identity or name.
    pub fn is_trouble(&self, state: &CharacterState) -> bool {
        if self.kind != HintTargetKind::Aspect {
            return false;
        }
        self.id == TROUBLE_ID
            || state
                .descriptor(&self.id)
                .is_some_and(|d| d.name.trim().eq_ignore_ascii_case("trouble"))
    }
}

/// Card as the backend sends it; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGmHint {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub narrative: Option<String>,
    #[serde(default)]
    pub mechanics: Option<String>,
}

/// Normalized card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GmHint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: HintKind,
    pub title: String,
    pub narrative: String,
    pub mechanics: String,
}

impl GmHint {
    fn fallback(kind: HintKind, narrative: &str, mechanics: &str) -> Self {
        Self {
            id: None,
            kind,
            title: kind.default_title().to_string(),
            narrative: narrative.to_string(),
            mechanics: mechanics.to_string(),
        }
    }

    fn as_kind(self, kind: HintKind) -> Self {
        Self { kind, ..self }
    }
}

fn clean(raw: RawGmHint, target: HintTargetKind) -> Option<GmHint> {
    let narrative = raw.narrative.unwrap_or_default().trim().to_string();
    let mechanics = raw.mechanics.unwrap_or_default().trim().to_string();
    if narrative.is_empty() || mechanics.is_empty() {
        return None;
    }
    let kind = raw
        .kind
        .as_deref()
        .and_then(HintKind::parse_lenient)
        .unwrap_or(match target {
            HintTargetKind::Aspect => HintKind::Invoke,
            HintTargetKind::Stunt => HintKind::Trigger,
        });
    let title = raw
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Hint".to_string());
    Some(GmHint {
        id: raw.id.filter(|i| !i.trim().is_empty()),
        kind,
        title,
        narrative,
        mechanics,
    })
}

/// Normalize raw cards into the fixed shape for `target`.
pub fn normalize_gm_hints(target: &HintTarget, is_trouble: bool, raw: Vec<RawGmHint>) -> Vec<GmHint> {
    let mut seen: HashSet<(HintKind, String)> = HashSet::new();
    let mut unique: Vec<GmHint> = Vec::new();
    for hint in raw.into_iter().filter_map(|h| clean(h, target.kind)) {
        if seen.insert((hint.kind, hint.narrative.to_lowercase())) {
            unique.push(hint);
        }
    }

    let take = |kinds: &[HintKind]| unique.iter().find(|h| kinds.contains(&h.kind)).cloned();

    match target.kind {
        HintTargetKind::Stunt => [HintKind::Trigger, HintKind::EdgeCase, HintKind::Synergy]
            .into_iter()
            .map(|kind| {
                take(&[kind]).unwrap_or_else(|| {
                    GmHint::fallback(kind, "Usage example.", "Add a concrete Fate mechanic line.")
                })
            })
            .collect(),
        HintTargetKind::Aspect if is_trouble => vec![
            take(&[HintKind::Compel]).unwrap_or_else(|| {
                GmHint::fallback(
                    HintKind::Compel,
                    "GM uses the Trouble against the PC.",
                    "Offer a fate point to introduce a complication tied to the Trouble.",
                )
            }),
            take(&[HintKind::PlayerInvoke, HintKind::Invoke])
                .map(|h| h.as_kind(HintKind::PlayerInvoke))
                .unwrap_or_else(|| {
                    GmHint::fallback(
                        HintKind::PlayerInvoke,
                        "Player leverages their Trouble in a clutch moment.",
                        "Spend a fate point to gain +2 or reroll.",
                    )
                }),
        ],
        HintTargetKind::Aspect => vec![take(&[HintKind::PlayerInvoke, HintKind::Invoke])
            .map(|h| h.as_kind(HintKind::PlayerInvoke))
            .unwrap_or_else(|| {
                GmHint::fallback(
                    HintKind::PlayerInvoke,
                    "Leverage this aspect to turn the situation to your favor.",
                    "Spend a fate point to gain +2 or reroll.",
                )
            })],
    }
}
