//! # Record Identifier Newtypes
//!
//! Newtype wrappers for the two record identifier namespaces. These
//! prevent accidental identifier confusion — you cannot pass an
//! `ExpenseId` where a `ConsultantId` is expected.
//!
//! Identifiers are server-generated UUID v4 values, assigned at creation
//! and immutable thereafter. On the wire they appear as plain UUID strings
//! under the `_id` key.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Unique identifier for an expense record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpenseId(pub Uuid);

/// Unique identifier for a consultant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsultantId(pub Uuid);

impl ExpenseId {
    /// Generate a new random expense identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidId`] when the input is not a
    /// well-formed UUID. The API layer reports this as 400, never 404 —
    /// a malformed identifier is a client error, not a missing record.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ValidationError::InvalidId(s.to_string()))
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl ConsultantId {
    /// Generate a new random consultant identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidId`] when the input is not a
    /// well-formed UUID.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ValidationError::InvalidId(s.to_string()))
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for ConsultantId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for ConsultantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
