//! Bot configuration: BaseConfig (Telegram + log + DB) + ExpenseSettings (time zone, currency, reminders).

mod base;
mod bot_config;
mod expense;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
pub use expense::ExpenseSettings;
