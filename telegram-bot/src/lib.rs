//! # Moneywise bot
//!
//! Wires moneywise-core, handler-chain, storage and expense-service to Telegram. Loads config from
//! env and runs the REPL plus the daily reminder loop.

pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod format;
pub mod handlers;
pub mod reminders;
pub mod runner;
pub mod telegram;

pub use cli::{load_config, report_month, report_today, Cli, Commands};
pub use commands::{parse_command, Command, CommandError, ExpenseDate};
pub use components::{build_bot_components, build_handler_chain, build_services, BotComponents, Services};
pub use config::{BaseConfig, BotConfig, ExpenseSettings};
pub use handlers::{ExpenseCommandHandler, UserTrackingHandler};
pub use reminders::{next_reminder_at, send_daily_reminders};
pub use runner::{process_message, run_bot, MoneywiseBot};
pub use telegram::{run_repl, TelegramBotAdapter, TelegramMessageWrapper, TelegramUserWrapper};
