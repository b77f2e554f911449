//! BotConfig: BaseConfig + ExpenseSettings. Use load() for env-based loading.

use anyhow::Result;

use super::{BaseConfig, ExpenseSettings};

/// Bot config: connection/storage settings plus expense settings.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub expense: ExpenseSettings,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides BOT_TOKEN.
    /// Call validate() after load before talking to Telegram.
    pub fn load(token: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(token)?;
        let expense = ExpenseSettings::from_env()?;
        Ok(Self { base, expense })
    }

    pub fn validate(&self) -> Result<()> {
        self.base.validate()
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }
    pub fn expense(&self) -> &ExpenseSettings {
        &self.expense
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn database_url(&self) -> &str {
        &self.base.database_url
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }
}
