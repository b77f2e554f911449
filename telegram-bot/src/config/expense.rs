//! Expense-tracking settings: time zone for "today"/"month", currency label, reminders, `/last` size.

use anyhow::{Context, Result};
use chrono::NaiveTime;
use chrono_tz::Tz;
use expense_service::MAX_RECENT_LIMIT;
use std::env;

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSettings {
    /// TIMEZONE (IANA name), default UTC
    pub timezone: Tz,
    /// CURRENCY, appended to every rendered amount
    pub currency: String,
    /// REMINDER_TIME (`HH:MM`, local), default 22:00
    pub reminder_time: NaiveTime,
    /// REMINDERS_ENABLED, default true
    pub reminders_enabled: bool,
    /// RECENT_LIMIT, default 10
    pub recent_limit: u32,
}

impl Default for ExpenseSettings {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            currency: "₸".to_string(),
            reminder_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
            reminders_enabled: true,
            recent_limit: 10,
        }
    }
}

impl ExpenseSettings {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let timezone = match env::var("TIMEZONE") {
            Ok(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("TIMEZONE is not a valid IANA zone ({}): {}", name, e))?,
            Err(_) => defaults.timezone,
        };
        let currency = env::var("CURRENCY").unwrap_or(defaults.currency);
        let reminder_time = match env::var("REMINDER_TIME") {
            Ok(s) => NaiveTime::parse_from_str(s.trim(), "%H:%M")
                .with_context(|| format!("REMINDER_TIME must be HH:MM, got {}", s))?,
            Err(_) => defaults.reminder_time,
        };
        let reminders_enabled = match env::var("REMINDERS_ENABLED") {
            Ok(s) => parse_flag(&s)
                .with_context(|| format!("REMINDERS_ENABLED must be true or false, got {}", s))?,
            Err(_) => defaults.reminders_enabled,
        };
        let recent_limit = match env::var("RECENT_LIMIT") {
            Ok(s) => s
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| (1..=MAX_RECENT_LIMIT).contains(n))
                .with_context(|| {
                    format!("RECENT_LIMIT must be between 1 and {}, got {}", MAX_RECENT_LIMIT, s)
                })?,
            Err(_) => defaults.recent_limit,
        };

        Ok(Self {
            timezone,
            currency,
            reminder_time,
            reminders_enabled,
            recent_limit,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
