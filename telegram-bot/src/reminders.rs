//! Evening reminder: once a day, at the configured local time, nudge users who opted in and
//! recorded nothing that day.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use expense_service::{ExpenseService, ServiceError, UserService};
use moneywise_core::{Bot, Chat};
use tracing::{error, info, instrument, warn};

use crate::format::REMINDER_TEXT;

/// First instant strictly after `now` whose local time in `tz` is `at`.
///
/// If `at` falls into a DST gap on some day, the reminder fires at the first valid local time after it.
pub fn next_reminder_at(now: DateTime<Utc>, tz: Tz, at: NaiveTime) -> DateTime<Utc> {
    let mut date = now.with_timezone(&tz).date_naive();
    for _ in 0..3 {
        let local = date.and_time(at);
        let candidate = tz
            .from_local_datetime(&local)
            .earliest()
            .or_else(|| tz.from_local_datetime(&(local + Duration::hours(1))).earliest())
            .map(|t| t.with_timezone(&Utc));
        if let Some(candidate) = candidate {
            if candidate > now {
                return candidate;
            }
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    now + Duration::days(1)
}

/// Sends the reminder to every opted-in user without expenses today. Returns how many were sent.
///
/// Per-user failures are logged and skipped; only failing to load the recipients is an error.
#[instrument(skip_all)]
pub async fn send_daily_reminders(
    expenses: &ExpenseService,
    users: &UserService,
    bot: &dyn Bot,
) -> Result<usize, ServiceError> {
    let today = expenses.today();
    let recipients = users.reminder_recipients().await?;
    let mut sent = 0;

    for user in recipients {
        match expenses.has_expenses_on(user.id, today).await {
            Ok(true) => continue,
            Ok(false) => {}
            Err(e) => {
                warn!(user_id = user.id, error = %e, "Skipping reminder, expense lookup failed");
                continue;
            }
        }
        match bot.send_message(&Chat::private(user.id), REMINDER_TEXT).await {
            Ok(()) => sent += 1,
            Err(e) => warn!(user_id = user.id, error = %e, "Failed to send reminder"),
        }
    }

    info!(sent, %today, "Daily reminders sent");
    Ok(sent)
}

/// Sleeps until the next reminder time, sends reminders, repeats. Never returns.
pub async fn run_reminder_loop(
    expenses: ExpenseService,
    users: UserService,
    bot: Arc<dyn Bot>,
    at: NaiveTime,
) {
    let timezone = expenses.timezone();
    loop {
        let now = Utc::now();
        let next = next_reminder_at(now, timezone, at);
        info!(next = %next, "step: waiting for next reminder run");
        tokio::time::sleep((next - now).to_std().unwrap_or(StdDuration::ZERO)).await;

        if let Err(e) = send_daily_reminders(&expenses, &users, bot.as_ref()).await {
            error!(error = %e, "Reminder run failed");
        }
    }
}
