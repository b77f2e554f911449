//! CLI parser, config loading and the offline report commands.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use expense_service::SystemClock;

use crate::components::build_services;
use crate::config::BotConfig;
use crate::format;

#[derive(Parser, Debug)]
#[command(name = "moneywise")]
#[command(about = "Expense-tracking Telegram bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the Telegram bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Print a user's expenses for today from the configured database.
    Today {
        #[arg(short, long)]
        user: i64,
    },
    /// Print a user's totals by category for a month (current month by default).
    Month {
        #[arg(short, long)]
        user: i64,
        #[arg(long, requires = "month")]
        year: Option<i32>,
        #[arg(long, requires = "year")]
        month: Option<u32>,
    },
}

/// Load BotConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    BotConfig::load(token)
}

/// Today's expenses for `user_id`, rendered as the bot would.
pub async fn report_today(config: &BotConfig, user_id: i64) -> Result<String> {
    let services = build_services(config, Arc::new(SystemClock)).await?;
    let expenses = services.expenses.list_today(user_id).await?;
    Ok(format::render_today(
        &expenses,
        config.expense().timezone,
        &config.expense().currency,
    ))
}

/// Monthly totals for `user_id`; `period` defaults to the current local month.
pub async fn report_month(
    config: &BotConfig,
    user_id: i64,
    period: Option<(i32, u32)>,
) -> Result<String> {
    let services = build_services(config, Arc::new(SystemClock)).await?;
    let (year, month) = period.unwrap_or_else(|| services.expenses.current_month());
    let summary = services
        .expenses
        .monthly_summary(user_id, year, month)
        .await?;
    Ok(format::render_month(
        &summary,
        year,
        month,
        &config.expense().currency,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BaseConfig, ExpenseSettings};
    use rust_decimal::Decimal;

    fn file_config(dir: &tempfile::TempDir) -> BotConfig {
        BotConfig {
            base: BaseConfig {
                bot_token: String::new(),
                telegram_api_url: None,
                log_file: dir.path().join("test.log").display().to_string(),
                database_url: dir.path().join("reports.db").display().to_string(),
            },
            expense: ExpenseSettings {
                currency: "USD".to_string(),
                ..ExpenseSettings::default()
            },
        }
    }

    #[tokio::test]
    async fn test_reports_read_the_configured_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(&dir);
        let services = build_services(&config, Arc::new(SystemClock)).await.unwrap();
        services
            .expenses
            .add_expense(7, Decimal::new(1250, 2), "food", None)
            .await
            .unwrap();

        let today = report_today(&config, 7).await.unwrap();
        let month = report_month(&config, 7, None).await.unwrap();

        assert!(today.contains("food: 12.5 USD"));
        assert!(month.contains("food: 12.5 USD"));
        assert_eq!(report_today(&config, 8).await.unwrap(), "No expenses today yet.");
    }

    #[test]
    fn test_parse_run_with_token() {
        let cli = Cli::try_parse_from(["moneywise", "run", "--token", "abc"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Run {
                token: Some("abc".to_string())
            }
        );
    }

    #[test]
    fn test_parse_month_requires_both_parts() {
        let cli = Cli::try_parse_from([
            "moneywise", "month", "--user", "7", "--year", "2024", "--month", "5",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Commands::Month {
                user: 7,
                year: Some(2024),
                month: Some(5)
            }
        );

        assert!(Cli::try_parse_from(["moneywise", "month", "--user", "7", "--year", "2024"]).is_err());
        assert!(Cli::try_parse_from(["moneywise", "today"]).is_err());
    }
}
