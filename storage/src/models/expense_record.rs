//! Expense rows: insert payload, stored record and per-category aggregate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::from_minor_units;
use super::timestamp::decode_timestamp;
use crate::error::StorageError;

/// Validated expense ready to be inserted. Amount is in minor units.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub user_id: i64,
    pub amount_minor: i64,
    pub category: String,
    pub description: Option<String>,
    pub spent_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A persisted expense. Maps to the `expenses` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    pub user_id: i64,
    pub amount_minor: i64,
    pub category: String,
    pub description: Option<String>,
    pub spent_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Amount as an exact decimal with two fractional digits.
    pub fn amount(&self) -> Decimal {
        from_minor_units(self.amount_minor)
    }
}

/// Sum of amounts for one category over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategoryTotal {
    pub category: String,
    pub total_minor: i64,
}

impl CategoryTotal {
    pub fn total(&self) -> Decimal {
        from_minor_units(self.total_minor)
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ExpenseRow {
    id: i64,
    user_id: i64,
    amount_minor: i64,
    category: String,
    description: Option<String>,
    spent_at: String,
    created_at: String,
}

impl TryFrom<ExpenseRow> for ExpenseRecord {
    type Error = StorageError;

    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            amount_minor: row.amount_minor,
            category: row.category,
            description: row.description,
            spent_at: decode_timestamp(&row.spent_at)?,
            created_at: decode_timestamp(&row.created_at)?,
        })
    }
}
