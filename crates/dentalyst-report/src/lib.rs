//! # dentalyst-report — Reporting Computations
//!
//! The reporting core of Dentalyst: turns fetched expense records into the
//! monthly report payload and the derived profit summary. Everything in
//! this crate is a pure function over already-fetched data — no I/O, no
//! clocks, no side effects — which is what makes the report numbers
//! reproducible and the tests exact.
//!
//! ## Pipeline
//!
//! ```text
//! store.find_in_range(start, end)      (date ascending)
//!         │
//!         ▼
//! aggregate::aggregate_by_category     groups: alphabetical by category,
//!         │                            entries: newest first
//!         ▼
//! summary::summarize                   gross income / total expenses /
//!                                      profit / profit margin
//! ```
//!
//! ## Crate Policy
//!
//! - Depends only on `dentalyst-core`.
//! - No `unsafe`, no panics outside tests.

pub mod aggregate;
pub mod summary;

pub use aggregate::{aggregate_by_category, CategoryGroup, GroupEntry, GroupKey};
pub use summary::{summarize, ProfitSummary};
