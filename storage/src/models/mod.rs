//! Row models and value encodings shared by the repositories.

mod expense_record;
mod money;
mod timestamp;
mod user_record;

pub use expense_record::{CategoryTotal, ExpenseRecord, NewExpense};
pub(crate) use expense_record::ExpenseRow;
pub use money::{from_minor_units, to_minor_units, MAX_AMOUNT_MINOR};
pub use timestamp::{decode_timestamp, encode_timestamp};
pub use user_record::{UserProfile, UserRecord};
pub(crate) use user_record::UserRow;
