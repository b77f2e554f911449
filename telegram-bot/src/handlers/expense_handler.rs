//! Handler that turns parsed commands into expense-service calls and reply texts.

use std::sync::Arc;

use async_trait::async_trait;
use expense_service::{ExpenseService, ServiceError, UserService};
use moneywise_core::{BotError, Handler, HandlerResponse, Message, Result};
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

use crate::commands::{parse_command, Command, CommandError};
use crate::config::ExpenseSettings;
use crate::format;

#[derive(Clone)]
pub struct ExpenseCommandHandler {
    expenses: ExpenseService,
    users: UserService,
    settings: ExpenseSettings,
    bot_username: Arc<RwLock<Option<String>>>,
}

impl ExpenseCommandHandler {
    pub fn new(
        expenses: ExpenseService,
        users: UserService,
        settings: ExpenseSettings,
        bot_username: Arc<RwLock<Option<String>>>,
    ) -> Self {
        Self {
            expenses,
            users,
            settings,
            bot_username,
        }
    }

    async fn execute(&self, message: &Message, command: Command) -> std::result::Result<String, ServiceError> {
        let user_id = message.user.id;
        let currency = self.settings.currency.as_str();
        let timezone = self.expenses.timezone();

        let text = match command {
            Command::Start => format::render_welcome(message.user.first_name.as_deref()),
            Command::Help => format::HELP_TEXT.to_string(),
            Command::Add {
                amount,
                category,
                description,
                date,
            } => {
                let today = self.expenses.today();
                let spent_on = date.map(|d| d.resolve(today));
                let expense = self
                    .expenses
                    .add_expense_on(user_id, amount, &category, description.as_deref(), spent_on)
                    .await?;
                format::render_saved(&expense, spent_on.filter(|d| *d != today), currency)
            }
            Command::Today => {
                let expenses = self.expenses.list_today(user_id).await?;
                format::render_today(&expenses, timezone, currency)
            }
            Command::Month { period } => {
                let (year, month) = period.unwrap_or_else(|| self.expenses.current_month());
                let summary = self.expenses.monthly_summary(user_id, year, month).await?;
                format::render_month(&summary, year, month, currency)
            }
            Command::Last { limit } => {
                let limit = limit.unwrap_or(self.settings.recent_limit);
                let expenses = self.expenses.recent_expenses(user_id, limit).await?;
                format::render_recent(&expenses, timezone, currency)
            }
            Command::ToggleReminder => {
                let enabled = self.users.toggle_reminders(user_id).await?;
                format::render_reminder_state(enabled)
            }
            Command::SetReminder(enabled) => {
                self.users.set_reminders(user_id, enabled).await?;
                format::render_reminder_state(enabled)
            }
            Command::Unknown(name) => format::render_unknown(&name),
        };
        Ok(text)
    }
}

#[async_trait]
impl Handler for ExpenseCommandHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        // Outside private chats only slash commands are read; free text there is conversation.
        let is_private = message.chat.chat_type == "private";
        if !is_private && !message.content.trim_start().starts_with('/') {
            return Ok(HandlerResponse::Ignore);
        }

        let bot_username = self.bot_username.read().await.clone();

        let command = match parse_command(&message.content, bot_username.as_deref()) {
            Ok(Some(command)) => command,
            Ok(None) => {
                // Chatter in private chats gets a hint; other bots' commands are left alone.
                let hint = is_private
                    && !message.content.trim().is_empty()
                    && !message.content.trim_start().starts_with('/');
                return Ok(if hint {
                    HandlerResponse::Reply(format::render_command_error(&CommandError::AddUsage))
                } else {
                    HandlerResponse::Ignore
                });
            }
            Err(e) => {
                info!(error = %e, "Could not parse command");
                return Ok(HandlerResponse::Reply(format::render_command_error(&e)));
            }
        };

        info!(command = ?command, "step: ExpenseCommandHandler executing command");

        match self.execute(message, command).await {
            Ok(text) => Ok(HandlerResponse::Reply(text)),
            Err(ServiceError::Validation(e)) => {
                info!(error = %e, "Rejected input");
                Ok(HandlerResponse::Reply(format::render_validation_error(&e)))
            }
            Err(ServiceError::UnknownUser(_)) => Ok(HandlerResponse::Reply(
                "I don't know you yet. Send /start first.".to_string(),
            )),
            Err(ServiceError::Storage(e)) => {
                error!(error = %e, user_id = message.user.id, "Expense command failed");
                Err(BotError::Storage(e.to_string()))
            }
        }
    }
}
