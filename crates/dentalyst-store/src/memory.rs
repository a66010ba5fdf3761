//! # In-Memory Stores
//!
//! Thread-safe, cloneable in-memory implementations of the store traits.
//! These back the test suite and the no-`DATABASE_URL` development mode.
//!
//! All operations are synchronous inside (`parking_lot::RwLock`, never
//! held across `.await` points; a panicking writer does not poison the
//! store). Records live in insertion order, so date-tied rows keep a
//! stable relative order across listings — matching the database's
//! stable pagination of equal keys.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use dentalyst_core::{
    Category, Consultant, ConsultantId, ConsultantUpdate, Expense, ExpenseId, NewConsultant,
    NewExpense,
};

use crate::error::StoreError;
use crate::traits::{ConsultantStore, ExpenseStore};

/// In-memory expense store.
#[derive(Clone, Default)]
pub struct MemoryExpenseStore {
    data: Arc<RwLock<Vec<Expense>>>,
}

impl MemoryExpenseStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held. Test helper.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ExpenseStore for MemoryExpenseStore {
    async fn insert(&self, draft: NewExpense) -> Result<Expense, StoreError> {
        let record = draft.into_expense(Utc::now());
        self.data.write().push(record.clone());
        Ok(record)
    }

    async fn insert_many(&self, drafts: Vec<NewExpense>) -> Result<Vec<Expense>, StoreError> {
        let now = Utc::now();
        let records: Vec<Expense> = drafts.into_iter().map(|d| d.into_expense(now)).collect();
        // One write lock for the whole batch: all-or-nothing, same as the
        // transactional Postgres path.
        self.data.write().extend(records.iter().cloned());
        Ok(records)
    }

    async fn list(&self) -> Result<Vec<Expense>, StoreError> {
        let mut records = self.data.read().clone();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Expense>, StoreError> {
        let mut records: Vec<Expense> = self
            .data
            .read()
            .iter()
            .filter(|e| e.date >= start && e.date <= end)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(records)
    }

    async fn delete(&self, id: ExpenseId) -> Result<Option<Expense>, StoreError> {
        let mut guard = self.data.write();
        let position = guard.iter().position(|e| e.id == id);
        Ok(position.map(|i| guard.remove(i)))
    }

    async fn delete_many(&self, ids: &[ExpenseId]) -> Result<u64, StoreError> {
        let mut guard = self.data.write();
        let before = guard.len();
        guard.retain(|e| !ids.contains(&e.id));
        Ok((before - guard.len()) as u64)
    }

    async fn references_consultant(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self
            .data
            .read()
            .iter()
            .any(|e| e.category == Category::Consultants && e.consultant_name.as_deref() == Some(name)))
    }
}

/// In-memory consultant store.
///
/// Name uniqueness is checked under the write lock, so a check-then-push
/// cannot race with a concurrent insert.
#[derive(Clone, Default)]
pub struct MemoryConsultantStore {
    data: Arc<RwLock<Vec<Consultant>>>,
}

impl MemoryConsultantStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConsultantStore for MemoryConsultantStore {
    async fn list(&self) -> Result<Vec<Consultant>, StoreError> {
        let mut records = self.data.read().clone();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    async fn get(&self, id: ConsultantId) -> Result<Option<Consultant>, StoreError> {
        Ok(self.data.read().iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Consultant>, StoreError> {
        Ok(self.data.read().iter().find(|c| c.name == name).cloned())
    }

    async fn insert(&self, draft: NewConsultant) -> Result<Consultant, StoreError> {
        let mut guard = self.data.write();
        if guard.iter().any(|c| c.name == draft.name) {
            return Err(StoreError::DuplicateName(draft.name));
        }
        let record = draft.into_consultant(Utc::now());
        guard.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: ConsultantId,
        update: ConsultantUpdate,
    ) -> Result<Option<Consultant>, StoreError> {
        let mut guard = self.data.write();

        if let Some(new_name) = &update.name {
            if guard.iter().any(|c| c.id != id && c.name == *new_name) {
                return Err(StoreError::DuplicateName(new_name.clone()));
            }
        }

        let Some(record) = guard.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            record.name = name;
        }
        if let Some(specialization) = update.specialization {
            record.specialization = Some(specialization);
        }
        if let Some(active) = update.active {
            record.active = active;
        }
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    async fn deactivate(&self, id: ConsultantId) -> Result<Option<Consultant>, StoreError> {
        let mut guard = self.data.write();
        let Some(record) = guard.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        record.active = false;
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    async fn remove(&self, id: ConsultantId) -> Result<Option<Consultant>, StoreError> {
        let mut guard = self.data.write();
        let position = guard.iter().position(|c| c.id == id);
        Ok(position.map(|i| guard.remove(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn draft(d: u32, category: Category, amount: f64) -> NewExpense {
        let consultant = matches!(category, Category::Consultants).then(|| "Dr. Rao".to_string());
        NewExpense::new(day(d), category, amount, None, consultant).unwrap()
    }

    // ── Expenses ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_insert_and_list_newest_first() {
        let store = MemoryExpenseStore::new();
        store.insert(draft(1, Category::Rent, 300.0)).await.unwrap();
        store.insert(draft(5, Category::Water, 50.0)).await.unwrap();
        store.insert(draft(3, Category::Maid, 20.0)).await.unwrap();

        let listed = store.list().await.unwrap();
        let dates: Vec<u32> = listed
            .iter()
            .map(|e| chrono::Datelike::day(&e.date))
            .collect();
        assert_eq!(dates, vec![5, 3, 1]);
    }

    #[tokio::test]
    async fn test_bulk_insert_yields_retrievable_records() {
        let store = MemoryExpenseStore::new();
        let drafts = vec![
            draft(1, Category::Rent, 300.0),
            draft(2, Category::Water, 50.0),
            draft(3, Category::Maid, 20.0),
        ];
        let created = store.insert_many(drafts).await.unwrap();
        assert_eq!(created.len(), 3);
        assert_eq!(store.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_find_in_range_is_inclusive_and_ascending() {
        let store = MemoryExpenseStore::new();
        for d in [1, 3, 5, 7] {
            store.insert(draft(d, Category::Rent, 1.0)).await.unwrap();
        }
        let found = store.find_in_range(day(3), day(5)).await.unwrap();
        let dates: Vec<u32> = found
            .iter()
            .map(|e| chrono::Datelike::day(&e.date))
            .collect();
        assert_eq!(dates, vec![3, 5]);
    }

    #[tokio::test]
    async fn test_delete_returns_the_record() {
        let store = MemoryExpenseStore::new();
        let created = store.insert(draft(1, Category::Rent, 300.0)).await.unwrap();
        let deleted = store.delete(created.id).await.unwrap().unwrap();
        assert_eq!(deleted.id, created.id);
        assert!(store.delete(created.id).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_many_counts_matches_only() {
        let store = MemoryExpenseStore::new();
        let a = store.insert(draft(1, Category::Rent, 1.0)).await.unwrap();
        let b = store.insert(draft(2, Category::Rent, 2.0)).await.unwrap();
        let count = store
            .delete_many(&[a.id, b.id, ExpenseId::new()])
            .await
            .unwrap();
        assert_eq!(count, 2);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_references_consultant_matches_category_and_name() {
        let store = MemoryExpenseStore::new();
        store
            .insert(draft(1, Category::Consultants, 500.0))
            .await
            .unwrap();
        assert!(store.references_consultant("Dr. Rao").await.unwrap());
        assert!(!store.references_consultant("Dr. Mehta").await.unwrap());
    }

    // ── Consultants ──────────────────────────────────────────────────

    #[tokio::test]
    async fn test_insert_rejects_duplicate_name() {
        let store = MemoryConsultantStore::new();
        store
            .insert(NewConsultant::new("Dr. Rao", None).unwrap())
            .await
            .unwrap();
        let err = store
            .insert(NewConsultant::new("Dr. Rao", None).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(name) if name == "Dr. Rao"));
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let store = MemoryConsultantStore::new();
        for name in ["Dr. Mehta", "Dr. Asher", "Dr. Rao"] {
            store
                .insert(NewConsultant::new(name, None).unwrap())
                .await
                .unwrap();
        }
        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Dr. Asher", "Dr. Mehta", "Dr. Rao"]);
    }

    #[tokio::test]
    async fn test_rename_checks_uniqueness_excluding_self() {
        let store = MemoryConsultantStore::new();
        let rao = store
            .insert(NewConsultant::new("Dr. Rao", None).unwrap())
            .await
            .unwrap();
        store
            .insert(NewConsultant::new("Dr. Mehta", None).unwrap())
            .await
            .unwrap();

        // Renaming onto an existing name fails.
        let err = store
            .update(
                rao.id,
                ConsultantUpdate::new(Some("Dr. Mehta".to_string()), None, None).unwrap(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(_)));

        // Re-asserting the record's own name is fine.
        let updated = store
            .update(
                rao.id,
                ConsultantUpdate::new(Some("Dr. Rao".to_string()), None, None).unwrap(),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Dr. Rao");
    }

    #[tokio::test]
    async fn test_deactivate_keeps_the_record() {
        let store = MemoryConsultantStore::new();
        let rao = store
            .insert(NewConsultant::new("Dr. Rao", None).unwrap())
            .await
            .unwrap();
        let deactivated = store.deactivate(rao.id).await.unwrap().unwrap();
        assert!(!deactivated.active);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_deletes_the_record() {
        let store = MemoryConsultantStore::new();
        let rao = store
            .insert(NewConsultant::new("Dr. Rao", None).unwrap())
            .await
            .unwrap();
        assert!(store.remove(rao.id).await.unwrap().is_some());
        assert!(store.list().await.unwrap().is_empty());
        assert!(store.remove(rao.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_none() {
        let store = MemoryConsultantStore::new();
        let result = store
            .update(ConsultantId::new(), ConsultantUpdate::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
