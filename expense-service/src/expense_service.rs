//! Expense recording, daily listing and monthly aggregation.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use storage::{ExpenseRecord, ExpenseStore, NewExpense, StorageError, MAX_AMOUNT_MINOR};
use tracing::{debug, error, info, instrument};

use crate::clock::Clock;
use crate::error::{ServiceError, ValidationError};
use crate::period::{day_range, local_midnight_utc, month_range};

pub const MAX_CATEGORY_LEN: usize = 50;
pub const MAX_DESCRIPTION_LEN: usize = 255;
pub const MAX_RECENT_LIMIT: u32 = 50;

/// Category → total spent, ordered by category name.
pub type MonthlySummary = BTreeMap<String, Decimal>;

#[derive(Clone)]
pub struct ExpenseService {
    store: Arc<dyn ExpenseStore>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
}

impl ExpenseService {
    pub fn new(store: Arc<dyn ExpenseStore>, clock: Arc<dyn Clock>, timezone: Tz) -> Self {
        Self {
            store,
            clock,
            timezone,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Local calendar date right now.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&self.timezone).date_naive()
    }

    /// Local (year, month) right now.
    pub fn current_month(&self) -> (i32, u32) {
        let today = self.today();
        (today.year(), today.month())
    }

    /// Parses user-typed amounts such as `12.50`, `12,50` or `1 200`.
    pub fn parse_amount(text: &str) -> Result<Decimal, ValidationError> {
        let cleaned: String = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == ',' { '.' } else { c })
            .collect();
        if cleaned.is_empty() {
            return Err(ValidationError::InvalidAmount(text.trim().to_string()));
        }
        let amount = Decimal::from_str(&cleaned)
            .map_err(|_| ValidationError::InvalidAmount(text.trim().to_string()))?;
        amount_to_minor(amount)?;
        Ok(amount)
    }

    /// Trims, collapses inner whitespace and lower-cases a category.
    pub fn normalize_category(category: &str) -> Result<String, ValidationError> {
        let normalized = category
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        if normalized.chars().count() > MAX_CATEGORY_LEN {
            return Err(ValidationError::CategoryTooLong {
                max: MAX_CATEGORY_LEN,
            });
        }
        Ok(normalized)
    }

    /// Records one expense at the current time. Nothing is written when validation fails.
    pub async fn add_expense(
        &self,
        user_id: i64,
        amount: Decimal,
        category: &str,
        description: Option<&str>,
    ) -> Result<ExpenseRecord, ServiceError> {
        self.add_expense_on(user_id, amount, category, description, None)
            .await
    }

    /// Records one expense on `spent_on` (a local date, default today).
    ///
    /// A past date keeps the current local time of day; future dates are rejected.
    #[instrument(skip(self, description))]
    pub async fn add_expense_on(
        &self,
        user_id: i64,
        amount: Decimal,
        category: &str,
        description: Option<&str>,
        spent_on: Option<NaiveDate>,
    ) -> Result<ExpenseRecord, ServiceError> {
        let amount_minor = amount_to_minor(amount)?;
        let category = Self::normalize_category(category)?;
        let description = normalize_description(description)?;

        let now = self.clock.now();
        let spent_at = match spent_on {
            Some(date) => self.spent_at_on(date, now)?,
            None => now,
        };
        let new_expense = NewExpense {
            user_id,
            amount_minor,
            category,
            description,
            spent_at,
            created_at: now,
        };

        let record = self
            .store
            .insert(&new_expense)
            .await
            .map_err(|e| log_storage("add_expense", user_id, e))?;

        info!(
            user_id,
            expense_id = record.id,
            category = %record.category,
            "Expense recorded"
        );
        Ok(record)
    }

    fn spent_at_on(
        &self,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, ValidationError> {
        let local_now = now.with_timezone(&self.timezone);
        let today = local_now.date_naive();
        if date > today {
            return Err(ValidationError::FutureDate(date));
        }
        if date == today {
            return Ok(now);
        }
        let local = date.and_time(local_now.time());
        Ok(match self.timezone.from_local_datetime(&local).earliest() {
            Some(t) => t.with_timezone(&Utc),
            // Time of day falls in a DST gap on that date.
            None => local_midnight_utc(&self.timezone, date),
        })
    }

    /// Today's expenses in the configured time zone, oldest first.
    #[instrument(skip(self))]
    pub async fn list_today(&self, user_id: i64) -> Result<Vec<ExpenseRecord>, ServiceError> {
        let (start, end) = day_range(&self.timezone, self.today());
        let expenses = self
            .store
            .list_between(user_id, start, end)
            .await
            .map_err(|e| log_storage("list_today", user_id, e))?;
        debug!(user_id, count = expenses.len(), "Listed today's expenses");
        Ok(expenses)
    }

    /// Total per category for one calendar month in the configured time zone.
    #[instrument(skip(self))]
    pub async fn monthly_summary(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
    ) -> Result<MonthlySummary, ServiceError> {
        let (start, end) = month_range(&self.timezone, year, month)?;
        let totals = self
            .store
            .category_totals_between(user_id, start, end)
            .await
            .map_err(|e| log_storage("monthly_summary", user_id, e))?;

        let summary: MonthlySummary = totals
            .into_iter()
            .map(|t| {
                let total = t.total();
                (t.category, total)
            })
            .collect();
        debug!(user_id, categories = summary.len(), "Built monthly summary");
        Ok(summary)
    }

    /// Newest expenses first; `limit` is clamped to `1..=MAX_RECENT_LIMIT`.
    #[instrument(skip(self))]
    pub async fn recent_expenses(
        &self,
        user_id: i64,
        limit: u32,
    ) -> Result<Vec<ExpenseRecord>, ServiceError> {
        let limit = limit.clamp(1, MAX_RECENT_LIMIT);
        self.store
            .list_recent(user_id, limit)
            .await
            .map_err(|e| log_storage("recent_expenses", user_id, e))
    }

    /// Whether the user recorded anything on the given local date.
    pub async fn has_expenses_on(&self, user_id: i64, date: NaiveDate) -> Result<bool, ServiceError> {
        let (start, end) = day_range(&self.timezone, date);
        self.store
            .exists_between(user_id, start, end)
            .await
            .map_err(|e| log_storage("has_expenses_on", user_id, e))
    }
}

fn amount_to_minor(amount: Decimal) -> Result<i64, ValidationError> {
    let minor =
        storage::to_minor_units(amount).ok_or(ValidationError::AmountTooLarge(amount))?;
    if minor <= 0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    if minor > MAX_AMOUNT_MINOR {
        return Err(ValidationError::AmountTooLarge(amount));
    }
    Ok(minor)
}

fn normalize_description(description: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(text) = description.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    if text.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooLong {
            max: MAX_DESCRIPTION_LEN,
        });
    }
    Ok(Some(text.to_string()))
}

fn log_storage(operation: &str, user_id: i64, e: StorageError) -> ServiceError {
    error!(operation, user_id, error = %e, "Storage operation failed");
    ServiceError::Storage(e)
}
