//! # PostgreSQL Stores
//!
//! Production implementations of [`ExpenseStore`] and [`ConsultantStore`]
//! over SQLx. Every operation first asks the [`ConnectionManager`] for
//! the pool, so requests fail fast with `Unavailable` while the database
//! is down.
//!
//! Queries use runtime binding with row structs (`query_as`) rather than
//! the compile-time checked macros, so the crate builds without a live
//! database. Bulk insert runs inside a single transaction; bulk delete is
//! one `DELETE ... WHERE id = ANY($1)` statement — both all-or-nothing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use dentalyst_core::{
    Consultant, ConsultantId, ConsultantUpdate, Expense, ExpenseId, NewConsultant, NewExpense,
};

use crate::connection::ConnectionManager;
use crate::error::StoreError;
use crate::traits::{ConsultantStore, ExpenseStore};

/// Maximum rows returned from a list query to prevent unbounded memory
/// growth.
const LIST_MAX_ROWS: i64 = 10_000;

const EXPENSE_COLUMNS: &str =
    "id, date, category, amount, description, consultant_name, created_at, updated_at";

const CONSULTANT_COLUMNS: &str = "id, name, specialization, active, created_at, updated_at";

// ─── Row Types ───────────────────────────────────────────────────────

#[derive(FromRow)]
struct ExpenseRow {
    id: Uuid,
    date: DateTime<Utc>,
    category: String,
    amount: f64,
    description: Option<String>,
    consultant_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ExpenseRow {
    fn into_record(self) -> Result<Expense, StoreError> {
        let category = self
            .category
            .parse()
            .map_err(|_| StoreError::CorruptRecord {
                id: self.id,
                detail: format!("unknown category {:?}", self.category),
            })?;
        Ok(Expense {
            id: ExpenseId(self.id),
            date: self.date,
            category,
            amount: self.amount,
            description: self.description,
            consultant_name: self.consultant_name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct ConsultantRow {
    id: Uuid,
    name: String,
    specialization: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConsultantRow {
    fn into_record(self) -> Consultant {
        Consultant {
            id: ConsultantId(self.id),
            name: self.name,
            specialization: self.specialization,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

// ─── Expense Store ───────────────────────────────────────────────────

/// PostgreSQL-backed expense store.
#[derive(Clone)]
pub struct PgExpenseStore {
    manager: ConnectionManager,
}

impl PgExpenseStore {
    pub fn new(manager: ConnectionManager) -> Self {
        Self { manager }
    }
}

async fn insert_expense_row<'e, E>(executor: E, record: &Expense) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query(
        "INSERT INTO expenses (id, date, category, amount, description,
         consultant_name, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(record.id.as_uuid())
    .bind(record.date)
    .bind(record.category.as_str())
    .bind(record.amount)
    .bind(&record.description)
    .bind(&record.consultant_name)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl ExpenseStore for PgExpenseStore {
    async fn insert(&self, draft: NewExpense) -> Result<Expense, StoreError> {
        let pool = self.manager.pool()?;
        let record = draft.into_expense(Utc::now());
        insert_expense_row(pool, &record).await?;
        Ok(record)
    }

    async fn insert_many(&self, drafts: Vec<NewExpense>) -> Result<Vec<Expense>, StoreError> {
        let pool = self.manager.pool()?;
        let now = Utc::now();
        let records: Vec<Expense> = drafts.into_iter().map(|d| d.into_expense(now)).collect();

        let mut tx = pool.begin().await?;
        for record in &records {
            insert_expense_row(&mut *tx, record).await?;
        }
        tx.commit().await?;

        Ok(records)
    }

    async fn list(&self) -> Result<Vec<Expense>, StoreError> {
        let pool = self.manager.pool()?;
        let rows = sqlx::query_as::<_, ExpenseRow>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses ORDER BY date DESC LIMIT $1"
        ))
        .bind(LIST_MAX_ROWS)
        .fetch_all(pool)
        .await?;
        rows.into_iter().map(ExpenseRow::into_record).collect()
    }

    async fn find_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Expense>, StoreError> {
        let pool = self.manager.pool()?;
        let rows = sqlx::query_as::<_, ExpenseRow>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses
             WHERE date >= $1 AND date <= $2
             ORDER BY date ASC LIMIT $3"
        ))
        .bind(start)
        .bind(end)
        .bind(LIST_MAX_ROWS)
        .fetch_all(pool)
        .await?;
        rows.into_iter().map(ExpenseRow::into_record).collect()
    }

    async fn delete(&self, id: ExpenseId) -> Result<Option<Expense>, StoreError> {
        let pool = self.manager.pool()?;
        let row = sqlx::query_as::<_, ExpenseRow>(&format!(
            "DELETE FROM expenses WHERE id = $1 RETURNING {EXPENSE_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await?;
        row.map(ExpenseRow::into_record).transpose()
    }

    async fn delete_many(&self, ids: &[ExpenseId]) -> Result<u64, StoreError> {
        let pool = self.manager.pool()?;
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let result = sqlx::query("DELETE FROM expenses WHERE id = ANY($1)")
            .bind(&uuids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn references_consultant(&self, name: &str) -> Result<bool, StoreError> {
        let pool = self.manager.pool()?;
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                 SELECT 1 FROM expenses
                 WHERE category = 'Consultants' AND consultant_name = $1
             )",
        )
        .bind(name)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }
}

// ─── Consultant Store ────────────────────────────────────────────────

/// PostgreSQL-backed consultant store.
///
/// Name uniqueness is enforced by the `consultants.name` UNIQUE
/// constraint; violations are mapped to [`StoreError::DuplicateName`] so
/// concurrent inserts cannot race past an application-level check.
#[derive(Clone)]
pub struct PgConsultantStore {
    manager: ConnectionManager,
}

impl PgConsultantStore {
    pub fn new(manager: ConnectionManager) -> Self {
        Self { manager }
    }
}

fn map_name_collision(name: &str, err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::DuplicateName(name.to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl ConsultantStore for PgConsultantStore {
    async fn list(&self) -> Result<Vec<Consultant>, StoreError> {
        let pool = self.manager.pool()?;
        let rows = sqlx::query_as::<_, ConsultantRow>(&format!(
            "SELECT {CONSULTANT_COLUMNS} FROM consultants ORDER BY name ASC LIMIT $1"
        ))
        .bind(LIST_MAX_ROWS)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(ConsultantRow::into_record).collect())
    }

    async fn get(&self, id: ConsultantId) -> Result<Option<Consultant>, StoreError> {
        let pool = self.manager.pool()?;
        let row = sqlx::query_as::<_, ConsultantRow>(&format!(
            "SELECT {CONSULTANT_COLUMNS} FROM consultants WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await?;
        Ok(row.map(ConsultantRow::into_record))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Consultant>, StoreError> {
        let pool = self.manager.pool()?;
        let row = sqlx::query_as::<_, ConsultantRow>(&format!(
            "SELECT {CONSULTANT_COLUMNS} FROM consultants WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(ConsultantRow::into_record))
    }

    async fn insert(&self, draft: NewConsultant) -> Result<Consultant, StoreError> {
        let pool = self.manager.pool()?;
        let record = draft.into_consultant(Utc::now());
        sqlx::query(
            "INSERT INTO consultants (id, name, specialization, active, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(record.id.as_uuid())
        .bind(&record.name)
        .bind(&record.specialization)
        .bind(record.active)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(pool)
        .await
        .map_err(|e| map_name_collision(&record.name, e))?;
        Ok(record)
    }

    async fn update(
        &self,
        id: ConsultantId,
        update: ConsultantUpdate,
    ) -> Result<Option<Consultant>, StoreError> {
        let pool = self.manager.pool()?;

        let Some(row) = sqlx::query_as::<_, ConsultantRow>(&format!(
            "SELECT {CONSULTANT_COLUMNS} FROM consultants WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await?
        else {
            return Ok(None);
        };

        let mut record = row.into_record();
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

        // The UNIQUE constraint rejects a rename onto another record's
        // name; rewriting this record's own name is not a violation.
        sqlx::query(
            "UPDATE consultants
             SET name = $2, specialization = $3, active = $4, updated_at = $5
             WHERE id = $1",
        )
        .bind(record.id.as_uuid())
        .bind(&record.name)
        .bind(&record.specialization)
        .bind(record.active)
        .bind(record.updated_at)
        .execute(pool)
        .await
        .map_err(|e| map_name_collision(&record.name, e))?;

        Ok(Some(record))
    }

    async fn deactivate(&self, id: ConsultantId) -> Result<Option<Consultant>, StoreError> {
        let pool = self.manager.pool()?;
        let row = sqlx::query_as::<_, ConsultantRow>(&format!(
            "UPDATE consultants SET active = FALSE, updated_at = $2
             WHERE id = $1 RETURNING {CONSULTANT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;
        Ok(row.map(ConsultantRow::into_record))
    }

    async fn remove(&self, id: ConsultantId) -> Result<Option<Consultant>, StoreError> {
        let pool = self.manager.pool()?;
        let row = sqlx::query_as::<_, ConsultantRow>(&format!(
            "DELETE FROM consultants WHERE id = $1 RETURNING {CONSULTANT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await?;
        Ok(row.map(ConsultantRow::into_record))
    }
}
