//! # Expense Records
//!
//! The expense record and its validated draft form. Stores accept only
//! [`NewExpense`] values, whose constructor enforces the amount and
//! consultant-name invariants — a draft that exists has already passed
//! validation, so no partial writes can occur on a validation failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::ValidationError;
use crate::identity::ExpenseId;

/// A persisted expense record.
///
/// Wire format matches the historical API: `_id` for the identifier,
/// camelCase field names, and `consultantName` present only when the
/// record carries one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Server-generated identifier, immutable after creation.
    #[serde(rename = "_id")]
    pub id: ExpenseId,
    /// When the expense occurred. The time component only matters for
    /// bounding range queries.
    pub date: DateTime<Utc>,
    /// Bookkeeping category.
    pub category: Category,
    /// Non-negative amount.
    pub amount: f64,
    /// Optional free-text note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Consultant name; present exactly when `category` is Consultants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultant_name: Option<String>,
    /// Set by the store at insert time.
    pub created_at: DateTime<Utc>,
    /// Set by the store on every write.
    pub updated_at: DateTime<Utc>,
}

/// A validated draft of an expense, ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub date: DateTime<Utc>,
    pub category: Category,
    pub amount: f64,
    pub description: Option<String>,
    pub consultant_name: Option<String>,
}

impl NewExpense {
    /// Build a validated expense draft.
    ///
    /// Rules enforced here:
    /// - `amount` must be finite and `>= 0`.
    /// - A Consultants-category draft must carry a non-empty (after trim)
    ///   consultant name; the stored name is the trimmed form.
    /// - For every other category the consultant name is discarded.
    /// - An empty or whitespace-only description is normalized to `None`.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a [`ValidationError`].
    pub fn new(
        date: DateTime<Utc>,
        category: Category,
        amount: f64,
        description: Option<String>,
        consultant_name: Option<String>,
    ) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::NonFiniteAmount);
        }
        if amount < 0.0 {
            return Err(ValidationError::NegativeAmount(amount));
        }

        let consultant_name = if category.requires_consultant_name() {
            let name = consultant_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or(ValidationError::MissingConsultantName)?;
            Some(name.to_string())
        } else {
            None
        };

        let description = description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(Self {
            date,
            category,
            amount,
            description,
            consultant_name,
        })
    }

    /// Materialize the draft into a record, assigning a fresh identity
    /// and write timestamps. Called by stores at insert time.
    pub fn into_expense(self, now: DateTime<Utc>) -> Expense {
        Expense {
            id: ExpenseId::new(),
            date: self.date,
            category: self.category,
            amount: self.amount,
            description: self.description,
            consultant_name: self.consultant_name,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_valid_draft() {
        let draft = NewExpense::new(day(1), Category::Rent, 300.0, None, None).unwrap();
        assert_eq!(draft.category, Category::Rent);
        assert_eq!(draft.amount, 300.0);
        assert!(draft.consultant_name.is_none());
    }

    #[test]
    fn test_zero_amount_is_allowed() {
        assert!(NewExpense::new(day(1), Category::Water, 0.0, None, None).is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let err = NewExpense::new(day(1), Category::Water, -5.0, None, None).unwrap_err();
        assert_eq!(err, ValidationError::NegativeAmount(-5.0));
    }

    #[test]
    fn test_nan_and_infinity_rejected() {
        assert_eq!(
            NewExpense::new(day(1), Category::Water, f64::NAN, None, None).unwrap_err(),
            ValidationError::NonFiniteAmount
        );
        assert_eq!(
            NewExpense::new(day(1), Category::Water, f64::INFINITY, None, None).unwrap_err(),
            ValidationError::NonFiniteAmount
        );
    }

    #[test]
    fn test_consultants_without_name_rejected() {
        let err = NewExpense::new(day(1), Category::Consultants, 100.0, None, None).unwrap_err();
        assert_eq!(err, ValidationError::MissingConsultantName);
    }

    #[test]
    fn test_consultants_with_blank_name_rejected() {
        let err = NewExpense::new(
            day(1),
            Category::Consultants,
            100.0,
            None,
            Some("   ".to_string()),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingConsultantName);
    }

    #[test]
    fn test_consultant_name_is_trimmed() {
        let draft = NewExpense::new(
            day(1),
            Category::Consultants,
            100.0,
            None,
            Some("  Dr. Rao  ".to_string()),
        )
        .unwrap();
        assert_eq!(draft.consultant_name.as_deref(), Some("Dr. Rao"));
    }

    #[test]
    fn test_consultant_name_dropped_for_other_categories() {
        let draft = NewExpense::new(
            day(1),
            Category::Rent,
            100.0,
            None,
            Some("Dr. Rao".to_string()),
        )
        .unwrap();
        assert!(draft.consultant_name.is_none());
    }

    #[test]
    fn test_blank_description_normalized_to_none() {
        let draft =
            NewExpense::new(day(1), Category::Rent, 100.0, Some("  ".to_string()), None).unwrap();
        assert!(draft.description.is_none());
    }

    #[test]
    fn test_expense_wire_format() {
        let expense = Expense {
            id: ExpenseId::new(),
            date: day(15),
            category: Category::GrossIncome,
            amount: 1000.0,
            description: None,
            consultant_name: None,
            created_at: day(15),
            updated_at: day(15),
        };
        let json = serde_json::to_value(&expense).unwrap();
        assert!(json.get("_id").is_some());
        assert_eq!(json["category"], "Gross Income");
        assert!(json.get("consultantName").is_none());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn test_expense_wire_format_includes_consultant_name() {
        let expense = Expense {
            id: ExpenseId::new(),
            date: day(15),
            category: Category::Consultants,
            amount: 500.0,
            description: None,
            consultant_name: Some("Dr. Rao".to_string()),
            created_at: day(15),
            updated_at: day(15),
        };
        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["consultantName"], "Dr. Rao");
    }
}
