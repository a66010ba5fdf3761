//! # Consultant Records
//!
//! Visiting consultants referenced by Consultants-category expenses.
//! Names are the linking key between the two collections, so they are
//! normalized (trimmed) at the boundary and must be unique store-wide;
//! the uniqueness check itself lives in the store, which owns the data.
//!
//! Deletion is soft when any expense references the consultant: the
//! record is kept with `active = false` so historical reports keep
//! resolving the name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::ConsultantId;

/// Minimum consultant name length after trimming.
pub const MIN_NAME_LEN: usize = 2;

/// A persisted consultant record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultant {
    /// Server-generated identifier.
    #[serde(rename = "_id")]
    pub id: ConsultantId,
    /// Unique display name, trimmed.
    pub name: String,
    /// Optional specialization (e.g. "Orthodontist").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    /// False once the consultant has been soft-deleted.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated draft of a consultant, ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewConsultant {
    pub name: String,
    pub specialization: Option<String>,
}

/// A validated partial update for an existing consultant.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsultantUpdate {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub active: Option<bool>,
}

/// Normalize and validate a consultant name: trim, reject empty, enforce
/// the minimum length. Returns the trimmed name.
pub fn normalize_name(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyConsultantName);
    }
    if trimmed.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::ConsultantNameTooShort { min: MIN_NAME_LEN });
    }
    Ok(trimmed.to_string())
}

impl NewConsultant {
    /// Build a validated consultant draft. The name is normalized; a
    /// blank specialization becomes `None`.
    pub fn new(name: &str, specialization: Option<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            name: normalize_name(name)?,
            specialization: normalize_specialization(specialization),
        })
    }

    /// Materialize the draft into a record, assigning a fresh identity
    /// and write timestamps. New consultants start active.
    pub fn into_consultant(self, now: DateTime<Utc>) -> Consultant {
        Consultant {
            id: ConsultantId::new(),
            name: self.name,
            specialization: self.specialization,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ConsultantUpdate {
    /// Build a validated partial update. A present name is normalized.
    pub fn new(
        name: Option<String>,
        specialization: Option<String>,
        active: Option<bool>,
    ) -> Result<Self, ValidationError> {
        let name = match name {
            Some(raw) => Some(normalize_name(&raw)?),
            None => None,
        };
        Ok(Self {
            name,
            specialization: normalize_specialization(specialization),
            active,
        })
    }

    /// Whether this update changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.specialization.is_none() && self.active.is_none()
    }
}

fn normalize_specialization(specialization: Option<String>) -> Option<String> {
    specialization
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims() {
        assert_eq!(normalize_name("  Dr. Rao  ").unwrap(), "Dr. Rao");
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert_eq!(
            normalize_name("   ").unwrap_err(),
            ValidationError::EmptyConsultantName
        );
        assert_eq!(
            normalize_name("").unwrap_err(),
            ValidationError::EmptyConsultantName
        );
    }

    #[test]
    fn test_normalize_rejects_single_char() {
        assert_eq!(
            normalize_name("D").unwrap_err(),
            ValidationError::ConsultantNameTooShort { min: MIN_NAME_LEN }
        );
        // A single char padded with whitespace is still too short.
        assert!(normalize_name(" D ").is_err());
    }

    #[test]
    fn test_two_chars_is_enough() {
        assert_eq!(normalize_name("Dr").unwrap(), "Dr");
    }

    #[test]
    fn test_new_consultant_blank_specialization() {
        let draft = NewConsultant::new("Dr. Rao", Some("  ".to_string())).unwrap();
        assert!(draft.specialization.is_none());
    }

    #[test]
    fn test_update_normalizes_name() {
        let update =
            ConsultantUpdate::new(Some("  Dr. Mehta ".to_string()), None, Some(false)).unwrap();
        assert_eq!(update.name.as_deref(), Some("Dr. Mehta"));
        assert_eq!(update.active, Some(false));
    }

    #[test]
    fn test_update_rejects_short_name() {
        assert!(ConsultantUpdate::new(Some("X".to_string()), None, None).is_err());
    }

    #[test]
    fn test_empty_update() {
        let update = ConsultantUpdate::new(None, None, None).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn test_consultant_wire_format() {
        let consultant = Consultant {
            id: ConsultantId::new(),
            name: "Dr. Rao".to_string(),
            specialization: None,
            active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&consultant).unwrap();
        assert!(json.get("_id").is_some());
        assert_eq!(json["name"], "Dr. Rao");
        assert_eq!(json["active"], true);
        assert!(json.get("specialization").is_none());
    }
}
