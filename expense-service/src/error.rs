//! Service error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use storage::StorageError;
use thiserror::Error;

/// Malformed or out-of-range input. Always the caller's fault; never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("non-positive amount")]
    NonPositiveAmount,

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("amount too large: {0}")]
    AmountTooLarge(Decimal),

    #[error("missing category")]
    MissingCategory,

    #[error("category longer than {max} characters")]
    CategoryTooLong { max: usize },

    #[error("description longer than {max} characters")]
    DescriptionTooLong { max: usize },

    #[error("date in the future: {0}")]
    FutureDate(NaiveDate),

    #[error("invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("unknown user: {0}")]
    UnknownUser(i64),
}

impl ServiceError {
    /// The validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ServiceError::Validation(e) => Some(e),
            _ => None,
        }
    }
}
