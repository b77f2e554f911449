//! Message processing and the long-running bot: reply dispatch, reminder task and the polling loop.

use std::sync::Arc;

use anyhow::Result;
use handler_chain::HandlerChain;
use moneywise_core::{init_tracing, Bot as CoreBot, HandlerResponse, Message};
use tracing::{error, info, instrument};

use crate::components::{build_bot_components, build_handler_chain, BotComponents};
use crate::config::BotConfig;
use crate::format::GENERIC_FAILURE_TEXT;
use crate::reminders::{run_reminder_loop, send_daily_reminders};
use crate::telegram::run_repl;

/// Runs the chain for one message and sends the reply, if any, through `bot`.
///
/// A failing chain is logged and answered with a generic apology. Only a failed send is an error.
#[instrument(skip_all, fields(user_id = message.user.id, chat_id = message.chat.id))]
pub async fn process_message(
    chain: &HandlerChain,
    bot: &dyn CoreBot,
    message: &Message,
) -> moneywise_core::Result<HandlerResponse> {
    info!(message_id = %message.id, "step: processing message (handler chain started)");

    let response = match chain.handle(message).await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Handler chain failed");
            HandlerResponse::Reply(GENERIC_FAILURE_TEXT.to_string())
        }
    };

    if let HandlerResponse::Reply(text) = &response {
        bot.reply_to(message, text).await?;
    }
    Ok(response)
}

/// MoneywiseBot: config, components and handler chain, without the Telegram REPL. Used by tests and
/// anything else that wants to drive the bot with core messages.
pub struct MoneywiseBot {
    pub config: BotConfig,
    pub components: BotComponents,
    pub handler_chain: HandlerChain,
}

impl MoneywiseBot {
    /// Builds the bot; replies go to Telegram.
    pub async fn new(config: BotConfig) -> Result<Self> {
        Self::build(config, None).await
    }

    /// Builds the bot with replies and reminders sent through `reply_bot`.
    pub async fn with_reply_bot(config: BotConfig, reply_bot: Arc<dyn CoreBot>) -> Result<Self> {
        Self::build(config, Some(reply_bot)).await
    }

    async fn build(config: BotConfig, reply_bot: Option<Arc<dyn CoreBot>>) -> Result<Self> {
        let components = build_bot_components(&config, reply_bot).await?;
        let handler_chain = build_handler_chain(&config, &components);
        Ok(Self {
            config,
            components,
            handler_chain,
        })
    }

    /// Handles one core message end to end (chain + reply).
    pub async fn handle_core_message(&self, message: &Message) -> Result<HandlerResponse> {
        Ok(process_message(
            &self.handler_chain,
            self.components.reply_bot.as_ref(),
            message,
        )
        .await?)
    }

    /// Runs one reminder pass now.
    pub async fn send_reminders(&self) -> Result<usize> {
        let services = &self.components.services;
        Ok(send_daily_reminders(
            &services.expenses,
            &services.users,
            self.components.reply_bot.as_ref(),
        )
        .await?)
    }
}

/// Main entry: validate config, init logging, build components, start reminders, then run the REPL.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    info!(
        database_url = %config.database_url(),
        timezone = %config.expense().timezone,
        reminders_enabled = config.expense().reminders_enabled,
        "Initializing bot"
    );

    let bot = MoneywiseBot::new(config).await?;
    let components = bot.components.clone();

    if bot.config.expense().reminders_enabled {
        tokio::spawn(run_reminder_loop(
            components.services.expenses.clone(),
            components.services.users.clone(),
            components.reply_bot.clone(),
            bot.config.expense().reminder_time,
        ));
    }

    info!("Bot started successfully");

    run_repl(
        components.teloxide_bot,
        bot.handler_chain,
        components.reply_bot,
        components.bot_username,
    )
    .await
}
