//! Expense recording and statistics.
//!
//! [`ExpenseService`] validates input and turns calendar questions ("today", "this month") into
//! UTC ranges in the configured time zone before asking the store. [`UserService`] keeps user
//! profiles and the daily reminder opt-in.

mod clock;
mod error;
mod expense_service;
mod period;
mod user_service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ServiceError, ValidationError};
pub use expense_service::{
    ExpenseService, MonthlySummary, MAX_CATEGORY_LEN, MAX_DESCRIPTION_LEN, MAX_RECENT_LIMIT,
};
pub use period::{day_range, local_midnight_utc, month_range};
pub use user_service::UserService;
