//! End-to-end tests for the bot: core message in → handler chain → reply out.
//!
//! Uses in-memory SQLite and a recording Bot instead of Telegram.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use moneywise_bot::format::{GENERIC_FAILURE_TEXT, REMINDER_TEXT};
use moneywise_bot::{BaseConfig, BotConfig, ExpenseSettings, MoneywiseBot};
use moneywise_core::{Bot, Chat, HandlerResponse, Message, User};

#[derive(Default)]
struct RecordingBot {
    sent: Mutex<Vec<(i64, String)>>,
}

impl RecordingBot {
    fn texts_for(&self, chat_id: i64) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == chat_id)
            .map(|(_, text)| text.clone())
            .collect()
    }

    fn last_for(&self, chat_id: i64) -> Option<String> {
        self.texts_for(chat_id).pop()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> moneywise_core::Result<()> {
        self.sent.lock().unwrap().push((chat.id, text.to_string()));
        Ok(())
    }
}

fn test_config() -> BotConfig {
    BotConfig {
        base: BaseConfig {
            bot_token: "test_bot_token_12345".to_string(),
            telegram_api_url: None,
            log_file: "logs/test.log".to_string(),
            database_url: "sqlite::memory:".to_string(),
        },
        expense: ExpenseSettings {
            currency: "₸".to_string(),
            ..ExpenseSettings::default()
        },
    }
}

async fn setup() -> (MoneywiseBot, Arc<RecordingBot>) {
    let recorder = Arc::new(RecordingBot::default());
    let bot = MoneywiseBot::with_reply_bot(test_config(), recorder.clone())
        .await
        .expect("bot must build");
    (bot, recorder)
}

fn message_from(user_id: i64, chat_type: &str, content: &str) -> Message {
    Message {
        id: format!("msg_{}", content.len()),
        user: User {
            id: user_id,
            username: Some(format!("user{}", user_id)),
            first_name: Some("Aruzhan".to_string()),
            last_name: None,
            language_code: Some("en".to_string()),
            is_bot: false,
        },
        chat: Chat {
            id: user_id,
            chat_type: chat_type.to_string(),
        },
        content: content.to_string(),
        created_at: Utc::now(),
    }
}

fn private(user_id: i64, content: &str) -> Message {
    message_from(user_id, "private", content)
}

/// **Test: /start greets; a free-text expense is saved and shows up in /today with a total.**
#[tokio::test]
async fn test_add_and_list_today() {
    let (bot, recorder) = setup().await;

    bot.handle_core_message(&private(1, "/start")).await.unwrap();
    assert!(recorder.last_for(1).unwrap().starts_with("Hi, Aruzhan!"));

    bot.handle_core_message(&private(1, "Food 12,50 lunch")).await.unwrap();
    assert_eq!(
        recorder.last_for(1).unwrap(),
        "Expense saved\nAmount: 12.5 ₸\nCategory: food\nComment: lunch"
    );

    bot.handle_core_message(&private(1, "/add 3 coffee")).await.unwrap();
    bot.handle_core_message(&private(1, "/today")).await.unwrap();

    let today = recorder.last_for(1).unwrap();
    assert!(today.starts_with("Today:\n"));
    assert!(today.contains("food: 12.5 ₸ (lunch)"));
    assert!(today.contains("coffee: 3 ₸"));
    assert!(today.ends_with("Total: 15.5 ₸"));
    assert!(today.find("food").unwrap() < today.find("coffee").unwrap());
}

/// **Test: a negative amount gets a corrective reply and nothing is stored.**
#[tokio::test]
async fn test_negative_amount_is_rejected() {
    let (bot, recorder) = setup().await;

    let response = bot.handle_core_message(&private(2, "/add -5 food")).await.unwrap();
    assert_eq!(
        response,
        HandlerResponse::Reply("The amount must be greater than zero.".to_string())
    );

    bot.handle_core_message(&private(2, "/today")).await.unwrap();
    assert_eq!(recorder.last_for(2).unwrap(), "No expenses today yet.");
}

/// **Test: /stats sums per category for the current month; /month with a bad month is corrected.**
#[tokio::test]
async fn test_month_summary() {
    let (bot, recorder) = setup().await;
    for text in ["food 10", "food 2.55", "taxi 30", "/add 0,45 food"] {
        bot.handle_core_message(&private(3, text)).await.unwrap();
    }

    bot.handle_core_message(&private(3, "/stats")).await.unwrap();
    let stats = recorder.last_for(3).unwrap();
    let lines: Vec<&str> = stats.lines().collect();
    assert_eq!(lines[1], "taxi: 30 ₸");
    assert_eq!(lines[2], "food: 13 ₸");
    assert_eq!(lines[3], "Total: 43 ₸");

    bot.handle_core_message(&private(3, "/month 2024-13")).await.unwrap();
    assert_eq!(recorder.last_for(3).unwrap(), "2024-13 is not a valid month.");

    bot.handle_core_message(&private(3, "/month 1999-01")).await.unwrap();
    assert_eq!(recorder.last_for(3).unwrap(), "No expenses in 1999-01.");
}

/// **Test: /last lists newest first and respects the count.**
#[tokio::test]
async fn test_last_expenses() {
    let (bot, recorder) = setup().await;
    for text in ["a 1", "b 2", "c 3"] {
        bot.handle_core_message(&private(4, text)).await.unwrap();
    }

    bot.handle_core_message(&private(4, "/last 2")).await.unwrap();

    let last = recorder.last_for(4).unwrap();
    assert!(last.starts_with("Last 2 expenses:"));
    assert!(last.contains("c: 3 ₸"));
    assert!(last.contains("b: 2 ₸"));
    assert!(!last.contains("a: 1 ₸"));
}

/// **Test: chatter gets a hint in private chats and is ignored in groups and for other bots.**
#[tokio::test]
async fn test_chatter_and_foreign_commands() {
    let (bot, recorder) = setup().await;

    let private_reply = bot.handle_core_message(&private(5, "hello")).await.unwrap();
    assert!(matches!(private_reply, HandlerResponse::Reply(_)));

    let group = bot
        .handle_core_message(&message_from(6, "group", "hello everyone"))
        .await
        .unwrap();
    assert_eq!(group, HandlerResponse::Continue);

    let foreign = bot
        .handle_core_message(&private(6, "/today@some_other_bot"))
        .await
        .unwrap();
    assert_eq!(foreign, HandlerResponse::Continue);
    assert!(recorder.texts_for(6).is_empty());
}

/// **Test: free text in a group is never recorded; slash commands there still are.**
#[tokio::test]
async fn test_group_chatter_is_not_recorded() {
    let (bot, recorder) = setup().await;

    let chatter = bot
        .handle_core_message(&message_from(7, "group", "see you at 5 tomorrow"))
        .await
        .unwrap();
    assert_eq!(chatter, HandlerResponse::Continue);
    assert!(recorder.texts_for(7).is_empty());

    bot.handle_core_message(&private(7, "/today")).await.unwrap();
    assert_eq!(recorder.last_for(7).unwrap(), "No expenses today yet.");

    bot.handle_core_message(&message_from(7, "supergroup", "/add 7 taxi"))
        .await
        .unwrap();
    assert!(recorder.last_for(7).unwrap().starts_with("Expense saved\nAmount: 7 ₸"));
}

/// **Test: an expense dated yesterday is saved with its date and left out of /today; future dates are refused.**
#[tokio::test]
async fn test_backdated_expense() {
    let (bot, recorder) = setup().await;

    bot.handle_core_message(&private(8, "taxi 500 yesterday airport"))
        .await
        .unwrap();
    let saved = recorder.last_for(8).unwrap();
    assert!(saved.starts_with("Expense saved\nAmount: 500 ₸\nCategory: taxi\nDate: "));
    assert!(saved.ends_with("Comment: airport"));

    bot.handle_core_message(&private(8, "/today")).await.unwrap();
    assert_eq!(recorder.last_for(8).unwrap(), "No expenses today yet.");

    bot.handle_core_message(&private(8, "/add 5 food 01.01.2999")).await.unwrap();
    assert!(recorder
        .last_for(8)
        .unwrap()
        .starts_with("01.01.2999 is in the future"));

    bot.handle_core_message(&private(8, "/last")).await.unwrap();
    let last = recorder.last_for(8).unwrap();
    assert!(last.contains("taxi: 500 ₸"));
    assert!(!last.contains("food"));
}

/// **Test: /reminder off and /reminder on set the opt-in explicitly.**
#[tokio::test]
async fn test_reminder_on_off() {
    let (bot, recorder) = setup().await;
    bot.handle_core_message(&private(13, "/start")).await.unwrap();

    bot.handle_core_message(&private(13, "/reminder off")).await.unwrap();
    assert!(recorder.last_for(13).unwrap().starts_with("Daily reminders are off"));
    bot.handle_core_message(&private(13, "/reminder off")).await.unwrap();
    assert!(recorder.last_for(13).unwrap().starts_with("Daily reminders are off"));
    assert_eq!(bot.send_reminders().await.unwrap(), 0);

    bot.handle_core_message(&private(13, "/reminder on")).await.unwrap();
    assert!(recorder.last_for(13).unwrap().starts_with("Daily reminders are on"));
    assert_eq!(bot.send_reminders().await.unwrap(), 1);
}

/// **Test: a message without a sender stops the chain silently.**
#[tokio::test]
async fn test_message_without_sender() {
    let (bot, recorder) = setup().await;

    let response = bot.handle_core_message(&private(0, "food 5")).await.unwrap();

    assert_eq!(response, HandlerResponse::Stop);
    assert!(recorder.sent.lock().unwrap().is_empty());
}

/// **Test: reminders go only to opted-in users with nothing recorded today.**
#[tokio::test]
async fn test_daily_reminders() {
    let (bot, recorder) = setup().await;
    bot.handle_core_message(&private(10, "/start")).await.unwrap();
    bot.handle_core_message(&private(11, "/start")).await.unwrap();
    bot.handle_core_message(&private(11, "food 5")).await.unwrap();
    bot.handle_core_message(&private(12, "/start")).await.unwrap();
    bot.handle_core_message(&private(12, "/reminder")).await.unwrap();
    assert!(recorder.last_for(12).unwrap().starts_with("Daily reminders are off"));

    let sent = bot.send_reminders().await.unwrap();

    assert_eq!(sent, 1);
    assert_eq!(recorder.last_for(10).unwrap(), REMINDER_TEXT);
    assert!(!recorder.texts_for(11).contains(&REMINDER_TEXT.to_string()));
    assert!(!recorder.texts_for(12).contains(&REMINDER_TEXT.to_string()));
}

/// **Test: a storage failure is answered with the generic failure text.**
#[tokio::test]
async fn test_storage_failure_replies_generic_text() {
    let (bot, recorder) = setup().await;
    bot.components.services.pool_manager.pool().close().await;

    let response = bot.handle_core_message(&private(20, "/today")).await.unwrap();

    assert_eq!(response, HandlerResponse::Reply(GENERIC_FAILURE_TEXT.to_string()));
    assert_eq!(recorder.last_for(20).unwrap(), GENERIC_FAILURE_TEXT);
}
