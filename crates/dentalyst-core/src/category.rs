//! # Expense Category — Single Source of Truth
//!
//! Defines the `Category` enum with all 13 bookkeeping categories used by
//! the clinic. This is the ONE definition used across the workspace. Every
//! `match` on `Category` must be exhaustive — adding a category forces
//! every consumer to handle it at compile time.
//!
//! The wire representation is the human-readable display name exactly as
//! it appears on the entry form and in stored records (e.g. `"Gross
//! Income"`, `"E-Bill"`). Parsing is case-sensitive and exact.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

/// All expense categories tracked by the clinic.
///
/// "Gross Income" is the sole income category; every other category is an
/// expense for reporting purposes. "Profit" is a user-enterable category
/// that the summary calculation treats like any other expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Clinic revenue for the period.
    #[serde(rename = "Gross Income")]
    GrossIncome,
    /// Visiting consultant fees. Records in this category must name the
    /// consultant.
    #[serde(rename = "Consultants")]
    Consultants,
    /// Dental materials and supplies.
    #[serde(rename = "Materials")]
    Materials,
    /// Chairside assistant wages.
    #[serde(rename = "Assistant")]
    Assistant,
    /// Housekeeping services.
    #[serde(rename = "Housekeeping")]
    Housekeeping,
    /// Water charges.
    #[serde(rename = "Water")]
    Water,
    /// Maid wages.
    #[serde(rename = "Maid")]
    Maid,
    /// Equipment and premises repairs.
    #[serde(rename = "Repairs")]
    Repairs,
    /// Premises rent.
    #[serde(rename = "Rent")]
    Rent,
    /// Electricity bill.
    #[serde(rename = "E-Bill")]
    EBill,
    /// Owner drawings recorded as a category.
    #[serde(rename = "Profit")]
    Profit,
    /// Bio-medical waste disposal and related costs.
    #[serde(rename = "Bio Medicals")]
    BioMedicals,
    /// Laboratory materials and outsourced lab work.
    #[serde(rename = "Lab Materials")]
    LabMaterials,
}

/// Total number of categories. Used for compile-time assertions.
pub const CATEGORY_COUNT: usize = 13;

impl Category {
    /// Returns all 13 categories in entry-form order.
    pub fn all() -> &'static [Category] {
        &[
            Self::GrossIncome,
            Self::Consultants,
            Self::Materials,
            Self::Assistant,
            Self::Housekeeping,
            Self::Water,
            Self::Maid,
            Self::Repairs,
            Self::Rent,
            Self::EBill,
            Self::Profit,
            Self::BioMedicals,
            Self::LabMaterials,
        ]
    }

    /// Returns the display-name string identifier for this category.
    ///
    /// This must match the serde serialization format, which is also the
    /// stored form in the expenses table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GrossIncome => "Gross Income",
            Self::Consultants => "Consultants",
            Self::Materials => "Materials",
            Self::Assistant => "Assistant",
            Self::Housekeeping => "Housekeeping",
            Self::Water => "Water",
            Self::Maid => "Maid",
            Self::Repairs => "Repairs",
            Self::Rent => "Rent",
            Self::EBill => "E-Bill",
            Self::Profit => "Profit",
            Self::BioMedicals => "Bio Medicals",
            Self::LabMaterials => "Lab Materials",
        }
    }

    /// Whether this category counts as income in the profit summary.
    ///
    /// Only "Gross Income" is income; everything else (including
    /// "Profit") is summed into total expenses.
    pub fn is_income(&self) -> bool {
        matches!(self, Self::GrossIncome)
    }

    /// Whether records in this category must carry a consultant name.
    pub fn requires_consultant_name(&self) -> bool {
        matches!(self, Self::Consultants)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    /// Parse a category from its display name.
    ///
    /// Accepts the same strings produced by [`Category::as_str()`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Gross Income" => Ok(Self::GrossIncome),
            "Consultants" => Ok(Self::Consultants),
            "Materials" => Ok(Self::Materials),
            "Assistant" => Ok(Self::Assistant),
            "Housekeeping" => Ok(Self::Housekeeping),
            "Water" => Ok(Self::Water),
            "Maid" => Ok(Self::Maid),
            "Repairs" => Ok(Self::Repairs),
            "Rent" => Ok(Self::Rent),
            "E-Bill" => Ok(Self::EBill),
            "Profit" => Ok(Self::Profit),
            "Bio Medicals" => Ok(Self::BioMedicals),
            "Lab Materials" => Ok(Self::LabMaterials),
            other => Err(ValidationError::UnknownCategory(other.to_string())),
        }
    }
}
