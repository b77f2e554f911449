//! Storage seam for the expense service. [`crate::ExpenseRepository`] is the SQLite implementation;
//! services hold an `Arc<dyn ExpenseStore>` so tests and alternative backends can be injected.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StorageError;
use crate::models::{CategoryTotal, ExpenseRecord, NewExpense};

/// Async expense persistence. All ranges are half-open: `start <= spent_at < end`.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Inserts one expense atomically (creating the owner row if unseen) and returns it with its id.
    async fn insert(&self, expense: &NewExpense) -> Result<ExpenseRecord, StorageError>;

    /// Expenses of a user in the range, ordered by spent_at then id.
    async fn list_between(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ExpenseRecord>, StorageError>;

    /// Per-category sums for a user in the range; categories without expenses are absent.
    async fn category_totals_between(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CategoryTotal>, StorageError>;

    /// Newest expenses of a user, at most `limit`.
    async fn list_recent(&self, user_id: i64, limit: u32) -> Result<Vec<ExpenseRecord>, StorageError>;

    /// Whether the user has any expense in the range.
    async fn exists_between(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, StorageError>;
}
