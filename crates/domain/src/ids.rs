use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::slugify;

/// String-backed identity. Sheet identities travel over the wire as plain
/// strings (`skill-fight`, `aspect-trouble`, `stunt-3`), so unlike UUID
/// newtypes they are cheap to read in logs and stable across generations.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }

            /// Blank identities come from malformed input and are filtered out
            /// by the store setters.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(SkillEntryId);
define_id!(DescriptorId);
define_id!(AbilityId);

/// Identity of the mandatory "High Concept" descriptor.
pub const HIGH_CONCEPT_ID: &str = "aspect-high-concept";
/// Identity of the mandatory "Trouble" descriptor.
pub const TROUBLE_ID: &str = "aspect-trouble";

const SKILL_ID_PREFIX: &str = "skill";

/// Source of fresh identities for entities that arrive without one.
///
/// Injected so tests can pin identities (`SequentialIdGenerator`) while the
/// running client uses random ones (`UuidIdGenerator`).
pub trait IdGenerator: Send + Sync {
    /// Produce a new identity starting with `prefix` (e.g. `"stunt"`).
    fn next_id(&self, prefix: &str) -> String;
}

/// Deterministic generator: `prefix-1`, `prefix-2`, ...
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self, prefix: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{prefix}-{n}")
    }
}

/// Random generator: `prefix-` followed by the first 8 hex digits of a v4 UUID.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self, prefix: &str) -> String {
        let uuid = Uuid::new_v4().simple().to_string();
        format!("{prefix}-{}", &uuid[..8])
    }
}

/// Derive a ladder identity from a skill name.
///
/// The base is `skill-<slug>`; while `is_taken` reports a collision the
/// suffixes `-2`, `-3`, ... are tried in order.
pub fn skill_id_for(name: &str, is_taken: impl Fn(&str) -> bool) -> SkillEntryId {
    let slug = slugify(name);
    let base = if slug.is_empty() {
        SKILL_ID_PREFIX.to_string()
    } else {
        format!("{SKILL_ID_PREFIX}-{slug}")
    };

    if !is_taken(&base) {
        return SkillEntryId::new(base);
    }

    let mut n = 2u32;
    loop {
        let candidate = format!("{base}-{n}");
        if !is_taken(&candidate) {
            return SkillEntryId::new(candidate);
        }
        n += 1;
    }
}
