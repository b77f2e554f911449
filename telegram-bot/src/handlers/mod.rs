//! Chain handlers: sender registration, then expense commands.

mod expense_handler;
mod user_tracking_handler;

pub use expense_handler::ExpenseCommandHandler;
pub use user_tracking_handler::UserTrackingHandler;
