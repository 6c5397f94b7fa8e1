//! Unified error types for the domain layer
//!
//! Placement rejections are not errors (see `skill_ladder::PlacementOutcome`)
//! and malformed entities are filtered by the setters, so this type only
//! covers parsing at the edges of the domain.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// ```ignore
    /// impl FromStr for LadderType {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s.trim() {
    ///             "1-4" => Ok(Self::OneToFour),
    ///             other => Err(DomainError::parse(format!("Unknown ladder type: {}", other))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
