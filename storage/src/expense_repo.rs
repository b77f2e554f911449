//! Expense repository: persistence and range queries for expenses.
//!
//! Uses SqlitePoolManager and the models (NewExpense, ExpenseRecord, CategoryTotal).
//! Implements [`ExpenseStore`] for the expense service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::error::StorageError;
use crate::models::{encode_timestamp, CategoryTotal, ExpenseRecord, ExpenseRow, NewExpense};
use crate::repository::ExpenseStore;
use crate::sqlite_pool::SqlitePoolManager;

const SELECT_EXPENSE: &str = "SELECT id, user_id, amount_minor, category, description, spent_at, created_at FROM expenses";

#[derive(Clone)]
pub struct ExpenseRepository {
    pool_manager: SqlitePoolManager,
}

impl ExpenseRepository {
    /// Creates a repository on an already bootstrapped pool.
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    /// Opens the database at `database_url`, creating the schema if needed.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::open(database_url).await?;
        Ok(Self::new(pool_manager))
    }

    #[cfg(test)]
    pub(crate) fn pool_manager_for_test(&self) -> &SqlitePoolManager {
        &self.pool_manager
    }

    fn rows_to_records(rows: Vec<ExpenseRow>) -> Result<Vec<ExpenseRecord>, StorageError> {
        rows.into_iter().map(ExpenseRecord::try_from).collect()
    }
}

#[async_trait]
impl ExpenseStore for ExpenseRepository {
    #[instrument(skip(self, expense), fields(user_id = expense.user_id))]
    async fn insert(&self, expense: &NewExpense) -> Result<ExpenseRecord, StorageError> {
        let created_at = encode_timestamp(expense.created_at);
        let mut tx = self.pool_manager.pool().begin().await?;

        sqlx::query("INSERT OR IGNORE INTO users (id, created_at, updated_at) VALUES (?, ?, ?)")
            .bind(expense.user_id)
            .bind(&created_at)
            .bind(&created_at)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            r#"
            INSERT INTO expenses (user_id, amount_minor, category, description, spent_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(expense.user_id)
        .bind(expense.amount_minor)
        .bind(&expense.category)
        .bind(&expense.description)
        .bind(encode_timestamp(expense.spent_at))
        .bind(&created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let id = result.last_insert_rowid();
        info!(
            expense_id = id,
            amount_minor = expense.amount_minor,
            category = %expense.category,
            "Saved expense"
        );

        Ok(ExpenseRecord {
            id,
            user_id: expense.user_id,
            amount_minor: expense.amount_minor,
            category: expense.category.clone(),
            description: expense.description.clone(),
            spent_at: expense.spent_at,
            created_at: expense.created_at,
        })
    }

    async fn list_between(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ExpenseRecord>, StorageError> {
        let sql = format!(
            "{} WHERE user_id = ? AND spent_at >= ? AND spent_at < ? ORDER BY spent_at ASC, id ASC",
            SELECT_EXPENSE
        );
        let rows: Vec<ExpenseRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(encode_timestamp(start))
            .bind(encode_timestamp(end))
            .fetch_all(self.pool_manager.pool())
            .await?;

        debug!(user_id, count = rows.len(), "Retrieved expenses for period");
        Self::rows_to_records(rows)
    }

    async fn category_totals_between(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CategoryTotal>, StorageError> {
        let totals: Vec<CategoryTotal> = sqlx::query_as(
            r#"
            SELECT category, SUM(amount_minor) AS total_minor
            FROM expenses
            WHERE user_id = ? AND spent_at >= ? AND spent_at < ?
            GROUP BY category
            ORDER BY category ASC
            "#,
        )
        .bind(user_id)
        .bind(encode_timestamp(start))
        .bind(encode_timestamp(end))
        .fetch_all(self.pool_manager.pool())
        .await?;

        debug!(user_id, categories = totals.len(), "Aggregated category totals");
        Ok(totals)
    }

    async fn list_recent(&self, user_id: i64, limit: u32) -> Result<Vec<ExpenseRecord>, StorageError> {
        let sql = format!(
            "{} WHERE user_id = ? ORDER BY spent_at DESC, id DESC LIMIT ?",
            SELECT_EXPENSE
        );
        let rows: Vec<ExpenseRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(i64::from(limit))
            .fetch_all(self.pool_manager.pool())
            .await?;

        debug!(user_id, count = rows.len(), "Retrieved recent expenses");
        Self::rows_to_records(rows)
    }

    async fn exists_between(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM expenses WHERE user_id = ? AND spent_at >= ? AND spent_at < ?)",
        )
        .bind(user_id)
        .bind(encode_timestamp(start))
        .bind(encode_timestamp(end))
        .fetch_one(self.pool_manager.pool())
        .await?;

        Ok(exists)
    }
}
