//! BDD step definitions for notification feature

use std::sync::Arc;

use cucumber::{given, then, when};

use homework_bot::config::TelegramConfig;
use homework_bot::notifier::send_message;
use homework_bot::telegram::TelegramNotifier;
use homework_bot::BotError;

use crate::doubles::{FixedPostClient, UnreachableClient};
use crate::world::HomeworkBotWorld;

fn telegram(http: Arc<dyn homework_bot::io::HttpClient>) -> TelegramNotifier {
    TelegramNotifier::new(&TelegramConfig::default(), "test-token", "12345", http)
}

#[given("a Telegram notifier with valid credentials")]
fn telegram_valid(world: &mut HomeworkBotWorld) {
    let http = Arc::new(FixedPostClient {
        status: 200,
        body: r#"{"ok":true,"result":{"message_id":1}}"#.to_string(),
    });
    world.notifier = Some(Arc::new(telegram(http)));
}

#[given("a Telegram notifier whose chat does not exist")]
fn telegram_api_error(world: &mut HomeworkBotWorld) {
    let http = Arc::new(FixedPostClient {
        status: 400,
        body: r#"{"ok":false,"description":"Bad Request: chat not found"}"#.to_string(),
    });
    world.notifier = Some(Arc::new(telegram(http)));
}

#[given("a Telegram notifier that is unreachable")]
fn telegram_unreachable(world: &mut HomeworkBotWorld) {
    world.notifier = Some(Arc::new(telegram(Arc::new(UnreachableClient))));
}

#[when(expr = "the message {string} is sent")]
async fn message_is_sent(world: &mut HomeworkBotWorld, message: String) {
    let notifier = world.notifier.as_ref().expect("notifier not set");
    world.notification_result = Some(send_message(notifier.as_ref(), &message).await);
}

#[then("the notification should succeed")]
fn notification_succeeds(world: &mut HomeworkBotWorld) {
    let result = world.notification_result.as_ref().expect("no result");
    result.as_ref().unwrap();
}

#[then(expr = "the notification should fail with a delivery error for {string}")]
fn notification_fails(world: &mut HomeworkBotWorld, expected: String) {
    let result = world.notification_result.as_ref().expect("no result");
    match result {
        Err(BotError::Delivery { message, .. }) => assert_eq!(message, &expected),
        other => panic!("expected BotError::Delivery, got {other:?}"),
    }
}
