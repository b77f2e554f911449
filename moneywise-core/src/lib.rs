//! # moneywise-core
//!
//! Core types and traits for the expense bot: [`Bot`], [`Handler`], message and user types,
//! error types and tracing initialization. Transport-agnostic; used by handler-chain and telegram-bot.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use error::{BotError, Result};
pub use logger::init_tracing;
pub use types::{Chat, Handler, HandlerResponse, Message, ToCoreMessage, ToCoreUser, User};
