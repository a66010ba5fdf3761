//! # dentalyst-core — Foundational Types for Dentalyst
//!
//! This crate is the bedrock of the Dentalyst expense tracker. It defines
//! the domain types shared by the report, store, and API crates. Every
//! other crate in the workspace depends on `dentalyst-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One category taxonomy.** The `Category` enum is the single
//!    definition consumed by request validation, persistence, and
//!    aggregation. Adding a category is one enum variant; every
//!    exhaustive `match` then fails to compile until updated.
//!
//! 2. **Newtype identifiers.** `ExpenseId` and `ConsultantId` wrap UUIDs
//!    with validated constructors. No bare strings for identifiers, and no
//!    passing an expense id where a consultant id is expected.
//!
//! 3. **Validated drafts.** Records enter the system as `NewExpense` /
//!    `NewConsultant` values whose constructors enforce the domain rules
//!    (non-negative finite amounts, the Consultants-category name
//!    requirement, trimmed consultant names of at least two characters).
//!    A draft that exists is a draft that passed validation.
//!
//! 4. **UTC-only timestamps.** All dates are `DateTime<Utc>`; lenient
//!    input parsing converts the accepted wire forms to UTC exactly once,
//!    at the boundary.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dentalyst-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug` and `Clone`, and implement
//!   `Serialize`/`Deserialize` where they cross the wire.

pub mod category;
pub mod consultant;
pub mod error;
pub mod expense;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use category::{Category, CATEGORY_COUNT};
pub use consultant::{Consultant, ConsultantUpdate, NewConsultant};
pub use error::ValidationError;
pub use expense::{Expense, NewExpense};
pub use identity::{ConsultantId, ExpenseId};
