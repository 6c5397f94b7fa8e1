//! Descriptor entity - a Fate aspect
//!
//! Two descriptors are mandatory and always present: High Concept and
//! Trouble. Their identities are reserved; any number of extra descriptors
//! may be added and removed.

use serde::{Deserialize, Serialize};

use crate::ids::{DescriptorId, HIGH_CONCEPT_ID, TROUBLE_ID};

/// Which of the two mandatory descriptors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MandatoryDescriptor {
    HighConcept,
    Trouble,
}

impl MandatoryDescriptor {
    pub const ALL: [MandatoryDescriptor; 2] =
        [MandatoryDescriptor::HighConcept, MandatoryDescriptor::Trouble];

    pub fn id(self) -> DescriptorId {
        DescriptorId::new(self.id_str())
    }

    pub fn id_str(self) -> &'static str {
        match self {
            Self::HighConcept => HIGH_CONCEPT_ID,
            Self::Trouble => TROUBLE_ID,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::HighConcept => "High Concept",
            Self::Trouble => "Trouble",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.id_str() == id)
    }
}

/// A narrative phrase describing the character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    pub id: DescriptorId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub user_edited: bool,
}

impl Descriptor {
    pub fn new(id: impl Into<DescriptorId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            locked: false,
            user_edited: false,
        }
    }

    /// Empty, unlocked mandatory descriptor.
    pub fn mandatory(which: MandatoryDescriptor) -> Self {
        Self::new(which.id(), which.label())
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn is_mandatory(&self) -> bool {
        MandatoryDescriptor::from_id(self.id.as_str()).is_some()
    }

    pub fn is_well_formed(&self) -> bool {
        !self.id.is_blank() && !self.name.trim().is_empty()
    }
}
