//! REPL runner: converts teloxide messages to core::Message and dispatches them through the
//! HandlerChain. Calls get_me first to populate bot_username.

use std::sync::Arc;

use anyhow::Result;
use handler_chain::HandlerChain;
use moneywise_core::{Bot as CoreBot, ToCoreMessage};
use teloxide::prelude::*;
use tracing::{error, info, instrument};

use super::adapters::TelegramMessageWrapper;
use crate::runner::process_message;

/// Starts the REPL with the given teloxide Bot, HandlerChain, reply sender and bot_username cache.
/// Each message is converted and processed in its own task so the REPL returns immediately.
#[instrument(skip(bot, handler_chain, reply_bot, bot_username))]
pub async fn run_repl(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    reply_bot: Arc<dyn CoreBot>,
    bot_username: Arc<tokio::sync::RwLock<Option<String>>>,
) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => {
            if let Some(username) = &me.user.username {
                *bot_username.write().await = Some(username.clone());
                info!(username = %username, "Bot username set before repl");
            }
        }
        Err(e) => error!(error = %e, "get_me failed; /cmd@username mentions will be ignored"),
    }

    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let chain = handler_chain.clone();
        let reply_bot = reply_bot.clone();

        async move {
            let core_msg = TelegramMessageWrapper(&msg).to_core();

            if msg.text().is_none() {
                info!(
                    user_id = core_msg.user.id,
                    chat_id = core_msg.chat.id,
                    "Received non-text message, ignoring"
                );
            } else {
                info!(
                    user_id = core_msg.user.id,
                    chat_id = core_msg.chat.id,
                    message_content = %core_msg.content,
                    "Received message"
                );

                tokio::spawn(async move {
                    if let Err(e) = process_message(&chain, reply_bot.as_ref(), &core_msg).await {
                        error!(error = %e, user_id = core_msg.user.id, "Failed to deliver reply");
                    }
                });
            }

            Ok(())
        }
    })
    .await;

    Ok(())
}
