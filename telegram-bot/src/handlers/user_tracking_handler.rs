//! Handler that records the sender's profile in before().

use async_trait::async_trait;
use expense_service::UserService;
use moneywise_core::{BotError, Handler, HandlerResponse, Message, Result};
use storage::UserProfile;
use tracing::{error, info, instrument, warn};

/// Upserts the sender on every message so reminders and expenses have an owner row; always continues
/// unless the message has no sender.
#[derive(Clone)]
pub struct UserTrackingHandler {
    users: UserService,
}

impl UserTrackingHandler {
    pub fn new(users: UserService) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Handler for UserTrackingHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        if message.user.id == 0 {
            warn!(chat_id = message.chat.id, "Message without sender, skipping");
            return Ok(false);
        }

        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            message_id = %message.id,
            "step: UserTrackingHandler before, registering sender"
        );

        let profile = UserProfile {
            id: message.user.id,
            username: message.user.username.clone(),
            first_name: message.user.first_name.clone(),
            last_name: message.user.last_name.clone(),
            language_code: message.user.language_code.clone(),
            is_bot: message.user.is_bot,
        };

        self.users.register(&profile).await.map_err(|e| {
            error!(error = %e, user_id = message.user.id, "Failed to register user");
            BotError::Storage(e.to_string())
        })?;

        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            replied = matches!(response, HandlerResponse::Reply(_)),
            "step: UserTrackingHandler after"
        );
        Ok(())
    }
}
