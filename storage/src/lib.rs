//! Storage crate: expense and user persistence on SQLite.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – ExpenseRecord, NewExpense, CategoryTotal, UserRecord, UserProfile, money and timestamp encoding
//! - [`repository`] – ExpenseStore trait (the seam the expense service depends on)
//! - [`expense_repo`] – ExpenseRepository (SQLite)
//! - [`user_repo`] – UserRepository (SQLite)
//! - [`schema`] – table bootstrap and column migrations
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod expense_repo;
mod models;
mod repository;
mod schema;
mod sqlite_pool;
mod user_repo;


pub use error::StorageError;
pub use expense_repo::ExpenseRepository;
pub use models::{
    decode_timestamp, encode_timestamp, from_minor_units, to_minor_units, CategoryTotal,
    ExpenseRecord, NewExpense, UserProfile, UserRecord, MAX_AMOUNT_MINOR,
};
pub use repository::ExpenseStore;
pub use sqlite_pool::SqlitePoolManager;
pub use user_repo::UserRepository;
