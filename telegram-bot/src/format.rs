//! Reply texts.

use chrono::NaiveDate;
use chrono_tz::Tz;
use expense_service::{MonthlySummary, ValidationError};
use rust_decimal::{Decimal, RoundingStrategy};
use storage::ExpenseRecord;

use crate::commands::CommandError;

pub const HELP_TEXT: &str = "\
Send an expense as text: <category> <amount> [comment], e.g. `coffee 3.50 with Ann`.
Add `yesterday` or a date like `05.03.2024` to record it on an earlier day.

Commands:
/add <amount> <category> [comment] - record an expense
/today - today's expenses
/stats, /month [YYYY-MM] - totals by category for a month
/last [N] - the most recent expenses
/reminder [on|off] - turn the evening reminder on or off
/help - this message";

pub const REMINDER_TEXT: &str =
    "No expenses recorded today yet. Bought anything? Send it like `food 12.50`.";

pub const GENERIC_FAILURE_TEXT: &str = "Something went wrong, please try again later.";

/// Two decimals at most, trailing zeros dropped: `250`, `12.5`, `12.05`.
pub fn format_amount(amount: Decimal, currency: &str) -> String {
    let normalized = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    if currency.is_empty() {
        normalized.to_string()
    } else {
        format!("{} {}", normalized, currency)
    }
}

pub fn render_welcome(first_name: Option<&str>) -> String {
    match first_name {
        Some(name) if !name.trim().is_empty() => format!(
            "Hi, {}! I keep track of your expenses.\n\n{}",
            name.trim(),
            HELP_TEXT
        ),
        _ => format!("Hi! I keep track of your expenses.\n\n{}", HELP_TEXT),
    }
}

/// `spent_on` is shown only for expenses recorded on an earlier day.
pub fn render_saved(expense: &ExpenseRecord, spent_on: Option<NaiveDate>, currency: &str) -> String {
    let mut lines = vec![
        "Expense saved".to_string(),
        format!("Amount: {}", format_amount(expense.amount(), currency)),
        format!("Category: {}", expense.category),
    ];
    if let Some(date) = spent_on {
        lines.push(format!("Date: {}", date.format("%d.%m.%Y")));
    }
    if let Some(description) = &expense.description {
        lines.push(format!("Comment: {}", description));
    }
    lines.join("\n")
}

pub fn render_today(expenses: &[ExpenseRecord], timezone: Tz, currency: &str) -> String {
    if expenses.is_empty() {
        return "No expenses today yet.".to_string();
    }
    let mut lines = vec!["Today:".to_string()];
    let mut total = Decimal::ZERO;
    for expense in expenses {
        total += expense.amount();
        let time = expense.spent_at.with_timezone(&timezone).format("%H:%M");
        lines.push(format!("{} — {}", time, expense_line(expense, currency)));
    }
    lines.push(format!("Total: {}", format_amount(total, currency)));
    lines.join("\n")
}

/// Categories by total descending, then by name.
pub fn render_month(summary: &MonthlySummary, year: i32, month: u32, currency: &str) -> String {
    if summary.is_empty() {
        return format!("No expenses in {:04}-{:02}.", year, month);
    }
    let mut rows: Vec<(&String, &Decimal)> = summary.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let mut lines = vec![format!("Expenses for {:04}-{:02}:", year, month)];
    lines.extend(
        rows.iter()
            .map(|(category, total)| format!("{}: {}", category, format_amount(**total, currency))),
    );
    let total: Decimal = summary.values().copied().sum();
    lines.push(format!("Total: {}", format_amount(total, currency)));
    lines.join("\n")
}

pub fn render_recent(expenses: &[ExpenseRecord], timezone: Tz, currency: &str) -> String {
    if expenses.is_empty() {
        return "No expenses yet.".to_string();
    }
    let mut lines = vec![format!("Last {} expenses:", expenses.len())];
    for expense in expenses {
        let when = expense
            .spent_at
            .with_timezone(&timezone)
            .format("%d.%m %H:%M");
        lines.push(format!("{} — {}", when, expense_line(expense, currency)));
    }
    lines.join("\n")
}

pub fn render_reminder_state(enabled: bool) -> String {
    if enabled {
        "Daily reminders are on. I will nudge you in the evening if nothing was recorded.".to_string()
    } else {
        "Daily reminders are off. Send /reminder to turn them back on.".to_string()
    }
}

pub fn render_unknown(name: &str) -> String {
    format!("Unknown command /{}. Send /help for the list of commands.", name)
}

/// Corrective reply for input the bot could not accept.
pub fn render_command_error(error: &CommandError) -> String {
    match error {
        CommandError::Invalid(e) => render_validation_error(e),
        CommandError::AddUsage => {
            "Send the amount and category, e.g. `/add 12.50 food lunch` or `food 12.50 lunch`.".to_string()
        }
        CommandError::MonthUsage => "Give the month as YYYY-MM, e.g. `/month 2024-05`.".to_string(),
        CommandError::LastUsage => "The count must be a positive number, e.g. `/last 25`.".to_string(),
        CommandError::ReminderUsage => "Use `/reminder`, `/reminder on` or `/reminder off`.".to_string(),
        CommandError::InvalidDate(text) => {
            format!("`{}` is not a date. Use DD.MM.YYYY, e.g. 05.03.2024, or `yesterday`.", text)
        }
    }
}

pub fn render_validation_error(error: &ValidationError) -> String {
    match error {
        ValidationError::NonPositiveAmount => "The amount must be greater than zero.".to_string(),
        ValidationError::InvalidAmount(text) => {
            format!("`{}` is not an amount. Use digits, e.g. 12.50 or 1 200.", text)
        }
        ValidationError::AmountTooLarge(_) => "That amount is too large.".to_string(),
        ValidationError::MissingCategory => "Please name a category, e.g. `food 12.50`.".to_string(),
        ValidationError::CategoryTooLong { max } => {
            format!("The category name is too long (at most {} characters).", max)
        }
        ValidationError::DescriptionTooLong { max } => {
            format!("The comment is too long (at most {} characters).", max)
        }
        ValidationError::FutureDate(date) => format!(
            "{} is in the future. Expenses can only be recorded for today or earlier.",
            date.format("%d.%m.%Y")
        ),
        ValidationError::InvalidMonth { year, month } => {
            format!("{}-{:02} is not a valid month.", year, month)
        }
    }
}

fn expense_line(expense: &ExpenseRecord, currency: &str) -> String {
    let mut line = format!(
        "{}: {}",
        expense.category,
        format_amount(expense.amount(), currency)
    );
    if let Some(description) = &expense.description {
        line.push_str(&format!(" ({})", description));
    }
    line
}
