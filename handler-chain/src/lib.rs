//! # Handler chain
//!
//! Runs a sequence of handlers for each inbound message: every `before` in order (any `false`
//! stops the chain), then `handle` until one returns Stop or Reply, then every `after` in reverse
//! order with the final response.

use moneywise_core::{Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Ordered list of handlers shared by all message tasks.
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler. Handlers run in insertion order; `after` runs in reverse.
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Runs the chain for one message. Returns Stop if a `before` vetoed, otherwise the first
    /// Stop/Reply from `handle`, or Continue when no handler answered.
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        info!(message_id = %message.id, "step: handler_chain started");

        if !self.run_before(message).await? {
            return Ok(HandlerResponse::Stop);
        }

        let response = self.run_handle(message).await?;

        for handler in self.handlers.iter().rev() {
            handler.after(message, &response).await?;
        }

        info!(
            message_id = %message.id,
            replied = matches!(response, HandlerResponse::Reply(_)),
            "step: handler_chain finished"
        );
        Ok(response)
    }

    async fn run_before(&self, message: &Message) -> Result<bool> {
        for handler in &self.handlers {
            if !handler.before(message).await? {
                info!(
                    handler = %std::any::type_name_of_val(handler.as_ref()),
                    "step: before returned false, chain stopped"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn run_handle(&self, message: &Message) -> Result<HandlerResponse> {
        for handler in &self.handlers {
            let handler_name = std::any::type_name_of_val(handler.as_ref());
            let response = handler.handle(message).await?;
            debug!(handler = %handler_name, response = ?response, "Handler processed");

            match response {
                HandlerResponse::Stop | HandlerResponse::Reply(_) => {
                    info!(handler = %handler_name, "step: handler answered, handle phase done");
                    return Ok(response);
                }
                HandlerResponse::Continue | HandlerResponse::Ignore => continue,
            }
        }
        Ok(HandlerResponse::Continue)
    }
}

// Integration tests live in tests/handler_chain_test.rs
