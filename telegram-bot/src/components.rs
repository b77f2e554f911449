//! Component factory: builds services, the Telegram client and the handler chain from config.

use std::sync::Arc;

use anyhow::Result;
use expense_service::{Clock, ExpenseService, SystemClock, UserService};
use handler_chain::HandlerChain;
use moneywise_core::Bot as CoreBot;
use storage::{ExpenseRepository, SqlitePoolManager, UserRepository};
use teloxide::prelude::*;
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

use crate::config::BotConfig;
use crate::handlers::{ExpenseCommandHandler, UserTrackingHandler};
use crate::telegram::TelegramBotAdapter;

/// Expense and user services sharing one pool.
#[derive(Clone)]
pub struct Services {
    pub pool_manager: SqlitePoolManager,
    pub expenses: ExpenseService,
    pub users: UserService,
}

/// Everything run_bot needs; produced by the component factory.
#[derive(Clone)]
pub struct BotComponents {
    pub services: Services,
    pub teloxide_bot: Bot,
    /// Sends replies and reminders. The Telegram adapter in production, a recording bot in tests.
    pub reply_bot: Arc<dyn CoreBot>,
    pub bot_username: Arc<RwLock<Option<String>>>,
}

/// Opens the database (creating and migrating the schema) and builds the services.
#[instrument(skip(config, clock))]
pub async fn build_services(config: &BotConfig, clock: Arc<dyn Clock>) -> Result<Services> {
    let pool_manager = SqlitePoolManager::open(config.database_url())
        .await
        .map_err(|e| {
            error!(
                error = %e,
                database_url = %config.database_url(),
                "Failed to initialize expense storage"
            );
            anyhow::anyhow!("Failed to initialize expense storage: {}", e)
        })?;

    let store = Arc::new(ExpenseRepository::new(pool_manager.clone()));
    let expenses = ExpenseService::new(store, clock.clone(), config.expense().timezone);
    let users = UserService::new(UserRepository::new(pool_manager.clone()), clock);

    info!(timezone = %config.expense().timezone, "Services ready");
    Ok(Services {
        pool_manager,
        expenses,
        users,
    })
}

/// Builds BotComponents. When `reply_bot_override` is `Some`, replies go there instead of Telegram.
#[instrument(skip(config, reply_bot_override))]
pub async fn build_bot_components(
    config: &BotConfig,
    reply_bot_override: Option<Arc<dyn CoreBot>>,
) -> Result<BotComponents> {
    let services = build_services(config, Arc::new(SystemClock)).await?;

    let teloxide_bot = {
        let bot = Bot::new(config.bot_token().to_string());
        if let Some(url_str) = config.telegram_api_url() {
            match reqwest::Url::parse(url_str) {
                Ok(url) => bot.set_api_url(url),
                Err(e) => {
                    error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                    bot
                }
            }
        } else {
            bot
        }
    };

    let reply_bot: Arc<dyn CoreBot> = match reply_bot_override {
        Some(bot) => bot,
        None => Arc::new(TelegramBotAdapter::new(teloxide_bot.clone())),
    };

    Ok(BotComponents {
        services,
        teloxide_bot,
        reply_bot,
        bot_username: Arc::new(RwLock::new(None)),
    })
}

/// Builds the handler chain (user tracking → expense commands).
pub fn build_handler_chain(config: &BotConfig, components: &BotComponents) -> HandlerChain {
    let user_tracking = Arc::new(UserTrackingHandler::new(components.services.users.clone()));
    let expense_commands = Arc::new(ExpenseCommandHandler::new(
        components.services.expenses.clone(),
        components.services.users.clone(),
        config.expense().clone(),
        components.bot_username.clone(),
    ));
    HandlerChain::new()
        .add_handler(user_tracking)
        .add_handler(expense_commands)
}
