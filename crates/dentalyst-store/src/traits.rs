//! # Store Traits
//!
//! The abstract interface between the API layer and storage. Both the
//! PostgreSQL and in-memory implementations satisfy these traits, so
//! handlers are written once and the test suite runs without a database.
//!
//! The traits require `Send + Sync` for shared use across request tasks.
//! Missing records are `Ok(None)`, not errors — only infrastructure
//! failures surface as [`StoreError`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use dentalyst_core::{
    Consultant, ConsultantId, ConsultantUpdate, Expense, ExpenseId, NewConsultant, NewExpense,
};

use crate::error::StoreError;

/// Storage operations for expense records.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Insert one record. Identity and timestamps are assigned here.
    async fn insert(&self, draft: NewExpense) -> Result<Expense, StoreError>;

    /// Insert a batch of records, all-or-nothing: either every draft is
    /// committed or none are.
    async fn insert_many(&self, drafts: Vec<NewExpense>) -> Result<Vec<Expense>, StoreError>;

    /// All records, sorted by date descending.
    async fn list(&self) -> Result<Vec<Expense>, StoreError>;

    /// Records whose date falls within `[start, end]` inclusive, sorted
    /// by date ascending.
    async fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Expense>, StoreError>;

    /// Delete one record, returning it, or `None` when the id is unknown.
    async fn delete(&self, id: ExpenseId) -> Result<Option<Expense>, StoreError>;

    /// Delete a batch of records in one statement, returning how many
    /// were removed.
    async fn delete_many(&self, ids: &[ExpenseId]) -> Result<u64, StoreError>;

    /// Whether any Consultants-category record carries this consultant
    /// name. Drives the consultant soft-delete decision.
    async fn references_consultant(&self, name: &str) -> Result<bool, StoreError>;
}

/// Storage operations for consultant records.
#[async_trait]
pub trait ConsultantStore: Send + Sync {
    /// All consultants, sorted by name ascending.
    async fn list(&self) -> Result<Vec<Consultant>, StoreError>;

    /// Look up a consultant by id.
    async fn get(&self, id: ConsultantId) -> Result<Option<Consultant>, StoreError>;

    /// Look up a consultant by exact (trimmed) name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Consultant>, StoreError>;

    /// Insert a consultant. Fails with [`StoreError::DuplicateName`] when
    /// the name is already taken.
    async fn insert(&self, draft: NewConsultant) -> Result<Consultant, StoreError>;

    /// Apply a partial update. Renames re-check name uniqueness excluding
    /// the record itself. `None` when the id is unknown.
    async fn update(
        &self,
        id: ConsultantId,
        update: ConsultantUpdate,
    ) -> Result<Option<Consultant>, StoreError>;

    /// Soft-delete: mark the consultant inactive, keeping the record.
    async fn deactivate(&self, id: ConsultantId) -> Result<Option<Consultant>, StoreError>;

    /// Hard-delete: physically remove the record.
    async fn remove(&self, id: ConsultantId) -> Result<Option<Consultant>, StoreError>;
}
