//! Text → [`Command`]. Everything the bot understands is decided here; handlers only match on the enum.

use chrono::{Duration, NaiveDate};
use expense_service::{ExpenseService, ValidationError};
use rust_decimal::Decimal;
use thiserror::Error;

/// One parsed user request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Add {
        amount: Decimal,
        category: String,
        description: Option<String>,
        /// `None` means now.
        date: Option<ExpenseDate>,
    },
    Today,
    /// `None` means the current month.
    Month { period: Option<(i32, u32)> },
    /// `None` means the configured default.
    Last { limit: Option<u32> },
    ToggleReminder,
    /// `/reminder on` or `/reminder off`.
    SetReminder(bool),
    /// Slash command the bot does not know.
    Unknown(String),
}

/// Day an expense was made, as typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseDate {
    /// `today`, `yesterday`
    DaysAgo(u32),
    /// `DD.MM.YYYY`
    On(NaiveDate),
}

impl ExpenseDate {
    /// The local date this refers to when `today` is the current local date.
    pub fn resolve(self, today: NaiveDate) -> NaiveDate {
        match self {
            ExpenseDate::DaysAgo(days) => today - Duration::days(i64::from(days)),
            ExpenseDate::On(date) => date,
        }
    }
}

/// Input that looked like a request but could not be understood. Rendered as a usage hint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("usage: /add <amount> <category> [comment]")]
    AddUsage,

    #[error("usage: /month [YYYY-MM]")]
    MonthUsage,

    #[error("usage: /last [count]")]
    LastUsage,

    #[error("usage: /reminder [on|off]")]
    ReminderUsage,

    #[error("not a date: {0}")]
    InvalidDate(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Parses a message.
///
/// Returns `Ok(None)` for text that is not addressed to the bot: commands for another bot
/// (`/today@other_bot`) and chatter without an amount.
pub fn parse_command(text: &str, bot_username: Option<&str>) -> Result<Option<Command>, CommandError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let Some(rest) = text.strip_prefix('/') else {
        return parse_free_text(text);
    };

    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim()),
        None => (rest, ""),
    };
    let name = match head.split_once('@') {
        Some((name, mention)) => {
            let addressed_to_us = bot_username
                .map(|u| u.eq_ignore_ascii_case(mention))
                .unwrap_or(false);
            if !addressed_to_us {
                return Ok(None);
            }
            name
        }
        None => head,
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "start" => Command::Start,
        "help" => Command::Help,
        "add" => parse_add_args(args)?,
        "today" => Command::Today,
        "stats" | "month" => Command::Month {
            period: parse_period(args)?,
        },
        "last" => Command::Last {
            limit: parse_limit(args)?,
        },
        "reminder" | "reminders" => parse_reminder_args(args)?,
        other => Command::Unknown(other.to_string()),
    };
    Ok(Some(command))
}

/// `/add <amount> <category> [comment…]`, with an optional date token anywhere.
fn parse_add_args(args: &str) -> Result<Command, CommandError> {
    let mut tokens: Vec<&str> = args.split_whitespace().collect();
    let date = take_date(&mut tokens)?;
    let amount_end = amount_span(&tokens, 0).ok_or(CommandError::AddUsage)?;
    let amount = ExpenseService::parse_amount(&tokens[..amount_end].join(" "))?;
    let category = tokens.get(amount_end).ok_or(CommandError::AddUsage)?;
    let description = join_non_empty(&tokens[amount_end + 1..]);

    Ok(Command::Add {
        amount,
        category: category.to_string(),
        description,
        date,
    })
}

/// `<category> <amount> [comment…]`, e.g. `taxi 1 500 airport`.
fn parse_free_text(text: &str) -> Result<Option<Command>, CommandError> {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    let date = take_date(&mut tokens)?;
    let Some(start) = tokens.iter().position(|t| is_amount_token(t)) else {
        return Ok(None);
    };
    if start == 0 {
        return Err(CommandError::AddUsage);
    }
    let end = amount_span(&tokens, start).ok_or(CommandError::AddUsage)?;
    let amount = ExpenseService::parse_amount(&tokens[start..end].join(" "))?;

    Ok(Some(Command::Add {
        amount,
        category: tokens[..start].join(" "),
        description: join_non_empty(&tokens[end..]),
        date,
    }))
}

/// Removes the first date token (`today`, `yesterday`, `DD.MM.YYYY`) from `tokens`.
fn take_date(tokens: &mut Vec<&str>) -> Result<Option<ExpenseDate>, CommandError> {
    let Some((index, date)) = tokens
        .iter()
        .enumerate()
        .find_map(|(i, token)| date_token(token).map(|date| (i, date)))
    else {
        return Ok(None);
    };
    let date = date?;
    tokens.remove(index);
    Ok(Some(date))
}

fn date_token(token: &str) -> Option<Result<ExpenseDate, CommandError>> {
    if token.eq_ignore_ascii_case("today") {
        Some(Ok(ExpenseDate::DaysAgo(0)))
    } else if token.eq_ignore_ascii_case("yesterday") {
        Some(Ok(ExpenseDate::DaysAgo(1)))
    } else if is_date_token(token) {
        Some(
            NaiveDate::parse_from_str(token, "%d.%m.%Y")
                .map(ExpenseDate::On)
                .map_err(|_| CommandError::InvalidDate(token.to_string())),
        )
    } else {
        None
    }
}

/// `D.M.YYYY` shape: two short numeric parts and a four-digit year.
fn is_date_token(token: &str) -> bool {
    let parts: Vec<&str> = token.split('.').collect();
    let numeric = |p: &str, len: std::ops::RangeInclusive<usize>| {
        len.contains(&p.len()) && p.bytes().all(|b| b.is_ascii_digit())
    };
    parts.len() == 3 && numeric(parts[0], 1..=2) && numeric(parts[1], 1..=2) && numeric(parts[2], 4..=4)
}

fn parse_reminder_args(args: &str) -> Result<Command, CommandError> {
    match args.to_ascii_lowercase().as_str() {
        "" => Ok(Command::ToggleReminder),
        "on" => Ok(Command::SetReminder(true)),
        "off" => Ok(Command::SetReminder(false)),
        _ => Err(CommandError::ReminderUsage),
    }
}

/// End index of the amount starting at `start`: the token itself plus any following
/// three-digit thousands groups (`1 200 000`).
fn amount_span(tokens: &[&str], start: usize) -> Option<usize> {
    if !tokens.get(start).is_some_and(|t| is_amount_token(t)) {
        return None;
    }
    let mut end = start + 1;
    while tokens
        .get(end)
        .is_some_and(|t| t.len() == 3 && t.bytes().all(|b| b.is_ascii_digit()))
    {
        end += 1;
    }
    Some(end)
}

fn is_amount_token(token: &str) -> bool {
    token.bytes().any(|b| b.is_ascii_digit())
        && token
            .bytes()
            .all(|b| b.is_ascii_digit() || b == b'.' || b == b',' || b == b'-' || b == b'+')
}

fn parse_period(args: &str) -> Result<Option<(i32, u32)>, CommandError> {
    if args.is_empty() {
        return Ok(None);
    }
    let (year, month) = args.split_once('-').ok_or(CommandError::MonthUsage)?;
    let year: i32 = year.parse().map_err(|_| CommandError::MonthUsage)?;
    let month: u32 = month.parse().map_err(|_| CommandError::MonthUsage)?;
    Ok(Some((year, month)))
}

fn parse_limit(args: &str) -> Result<Option<u32>, CommandError> {
    if args.is_empty() {
        return Ok(None);
    }
    match args.parse::<u32>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(CommandError::LastUsage),
    }
}

fn join_non_empty(tokens: &[&str]) -> Option<String> {
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn parse(text: &str) -> Result<Option<Command>, CommandError> {
        parse_command(text, Some("moneywise_bot"))
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("/start").unwrap(), Some(Command::Start));
        assert_eq!(parse("/help").unwrap(), Some(Command::Help));
        assert_eq!(parse("/today").unwrap(), Some(Command::Today));
        assert_eq!(parse("/reminder").unwrap(), Some(Command::ToggleReminder));
        assert_eq!(parse("/reminder off").unwrap(), Some(Command::SetReminder(false)));
        assert_eq!(parse("/reminder ON").unwrap(), Some(Command::SetReminder(true)));
        assert_eq!(parse("/reminder later"), Err(CommandError::ReminderUsage));
        assert_eq!(
            parse("/frobnicate now").unwrap(),
            Some(Command::Unknown("frobnicate".to_string()))
        );
    }

    #[test]
    fn test_add_command() {
        assert_eq!(
            parse("/add 12,50 Food lunch with team").unwrap(),
            Some(Command::Add {
                amount: dec("12.50"),
                category: "Food".to_string(),
                description: Some("lunch with team".to_string()),
                date: None,
            })
        );
        assert_eq!(
            parse("/add 1 200 rent").unwrap(),
            Some(Command::Add {
                amount: dec("1200"),
                category: "rent".to_string(),
                description: None,
                date: None,
            })
        );
    }

    #[test]
    fn test_add_command_errors() {
        assert_eq!(parse("/add"), Err(CommandError::AddUsage));
        assert_eq!(parse("/add food 12"), Err(CommandError::AddUsage));
        assert_eq!(parse("/add 12"), Err(CommandError::AddUsage));
        assert_eq!(
            parse("/add -5 food"),
            Err(CommandError::Invalid(ValidationError::NonPositiveAmount))
        );
    }

    #[test]
    fn test_free_text_expense() {
        assert_eq!(
            parse("taxi 1 500 to the airport").unwrap(),
            Some(Command::Add {
                amount: dec("1500"),
                category: "taxi".to_string(),
                description: Some("to the airport".to_string()),
                date: None,
            })
        );
        assert_eq!(
            parse("eating out 7.5").unwrap(),
            Some(Command::Add {
                amount: dec("7.5"),
                category: "eating out".to_string(),
                description: None,
                date: None,
            })
        );
        assert_eq!(parse("hello there").unwrap(), None);
        assert_eq!(parse("500 coffee"), Err(CommandError::AddUsage));
    }

    #[test]
    fn test_month_and_stats() {
        assert_eq!(
            parse("/stats").unwrap(),
            Some(Command::Month { period: None })
        );
        assert_eq!(
            parse("/month 2024-02").unwrap(),
            Some(Command::Month {
                period: Some((2024, 2))
            })
        );
        assert_eq!(parse("/month february"), Err(CommandError::MonthUsage));
    }

    #[test]
    fn test_last() {
        assert_eq!(parse("/last").unwrap(), Some(Command::Last { limit: None }));
        assert_eq!(
            parse("/last 25").unwrap(),
            Some(Command::Last { limit: Some(25) })
        );
        assert_eq!(parse("/last 0"), Err(CommandError::LastUsage));
        assert_eq!(parse("/last many"), Err(CommandError::LastUsage));
    }

    #[test]
    fn test_bot_mention_suffix() {
        assert_eq!(parse("/today@MoneyWise_Bot").unwrap(), Some(Command::Today));
        assert_eq!(parse("/today@other_bot").unwrap(), None);
        assert_eq!(parse_command("/today@moneywise_bot", None).unwrap(), None);
    }

    #[test]
    fn test_add_with_date() {
        assert_eq!(
            parse("/add 12 food 05.03.2024 market").unwrap(),
            Some(Command::Add {
                amount: dec("12"),
                category: "food".to_string(),
                description: Some("market".to_string()),
                date: NaiveDate::from_ymd_opt(2024, 3, 5).map(ExpenseDate::On),
            })
        );
        assert_eq!(
            parse("taxi 1 500 Yesterday airport").unwrap(),
            Some(Command::Add {
                amount: dec("1500"),
                category: "taxi".to_string(),
                description: Some("airport".to_string()),
                date: Some(ExpenseDate::DaysAgo(1)),
            })
        );
        assert_eq!(
            parse("/add 3 coffee 31.02.2024"),
            Err(CommandError::InvalidDate("31.02.2024".to_string()))
        );
    }

    #[test]
    fn test_expense_date_resolve() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(ExpenseDate::DaysAgo(0).resolve(today), today);
        assert_eq!(
            ExpenseDate::DaysAgo(1).resolve(today),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        let fixed = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(ExpenseDate::On(fixed).resolve(today), fixed);
    }
}
