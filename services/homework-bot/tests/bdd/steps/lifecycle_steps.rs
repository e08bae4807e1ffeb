//! BDD step definitions for configuration and lifecycle feature

use std::sync::Arc;

use cucumber::{given, then, when};
use tokio_util::sync::CancellationToken;

use homework_bot::io::HttpClient;
use homework_bot::state::PollState;
use homework_bot::HomeworkBotBuilder;

use crate::doubles::{RecordedRequest, RecordingHttpClient};
use crate::world::HomeworkBotWorld;

const ALL_SECRETS: [(&str, &str); 3] = [
    ("PRACTICUM_TOKEN", "practicum-token"),
    ("TELEGRAM_TOKEN", "telegram-token"),
    ("CHAT_ID", "12345"),
];

fn builder(world: &mut HomeworkBotWorld) -> HomeworkBotBuilder {
    let http = world
        .lifecycle_http
        .get_or_insert_with(|| Arc::new(RecordingHttpClient::default()))
        .clone();

    HomeworkBotBuilder::new(world.config.clone())
        .with_http_client(http as Arc<dyn HttpClient>)
        .with_initial_state(PollState::new(100))
}

async fn recorded(world: &HomeworkBotWorld, method: &str) -> Vec<RecordedRequest> {
    let http = world
        .lifecycle_http
        .as_ref()
        .expect("no recording HTTP client");
    let requests = http.requests.read().await;
    requests
        .iter()
        .filter(|r| r.method == method)
        .cloned()
        .collect()
}

// --- Given steps ---

#[given("an environment with all secrets")]
fn environment_with_all_secrets(world: &mut HomeworkBotWorld) {
    for (name, value) in ALL_SECRETS {
        world.environment.insert(name.to_string(), value.to_string());
    }
}

#[given(expr = "an environment without {string}")]
fn environment_without(world: &mut HomeworkBotWorld, missing: String) {
    for (name, value) in ALL_SECRETS {
        if name != missing {
            world.environment.insert(name.to_string(), value.to_string());
        }
    }
}

#[given(expr = "a config file setting the Telegram chat to {string}")]
fn config_file_chat(world: &mut HomeworkBotWorld, chat_id: String) {
    let json = format!(r#"{{"telegram": {{"chat_id": "{}"}}}}"#, chat_id);
    world.config = serde_json::from_str(&json).expect("valid config JSON");
}

// --- When steps ---

#[when("secrets are resolved")]
fn secrets_resolved(world: &mut HomeworkBotWorld) {
    let environment = world.environment.clone();
    world.secrets_result = Some(
        world
            .config
            .resolve_secrets_with(|name| environment.get(name).cloned()),
    );
}

#[when("the bot is built and runs one cycle")]
async fn built_and_runs_once(world: &mut HomeworkBotWorld) {
    let environment = world.environment.clone();
    world
        .config
        .resolve_secrets_with(|name| environment.get(name).cloned())
        .expect("secrets should resolve");

    let mut bot = builder(world).build().expect("bot should build");
    world.last_outcome = Some(bot.run_once().await);
}

#[when("the bot is built without secrets")]
fn built_without_secrets(world: &mut HomeworkBotWorld) {
    world.build_error = builder(world).build().err().map(|e| e.to_string());
}

#[when("the bot is started with a cancelled token")]
async fn started_cancelled(world: &mut HomeworkBotWorld) {
    let environment = world.environment.clone();
    world
        .config
        .resolve_secrets_with(|name| environment.get(name).cloned())
        .expect("secrets should resolve");

    let cancel = CancellationToken::new();
    cancel.cancel();
    let bot = builder(world)
        .with_cancellation_token(cancel)
        .build()
        .expect("bot should build");
    world.start_succeeded = Some(bot.start().await.is_ok());
}

// --- Then steps ---

#[then(expr = "secret resolution should fail naming {string}")]
fn resolution_fails(world: &mut HomeworkBotWorld, name: String) {
    let result = world.secrets_result.as_ref().expect("secrets not resolved");
    let err = result.as_ref().expect_err("expected missing secret");
    assert!(err.to_string().contains(&name), "{err}");
}

#[then("secret resolution should succeed")]
fn resolution_succeeds(world: &mut HomeworkBotWorld) {
    let result = world.secrets_result.as_ref().expect("secrets not resolved");
    result.as_ref().unwrap();
}

#[then(expr = "the Telegram chat should be {string}")]
fn chat_should_be(world: &mut HomeworkBotWorld, chat_id: String) {
    let credentials = world.config.credentials().expect("credentials");
    assert_eq!(credentials.chat_id, chat_id);
}

#[then(expr = "the build should fail naming {string}")]
fn build_fails(world: &mut HomeworkBotWorld, name: String) {
    let err = world.build_error.as_ref().expect("expected build failure");
    assert!(err.contains(&name), "{err}");
}

#[then(expr = "the review API should have been called with header {string} set to {string}")]
async fn api_called_with_header(world: &mut HomeworkBotWorld, header: String, value: String) {
    let requests = recorded(world, "GET").await;
    assert_eq!(requests.len(), 1, "{requests:?}");
    assert!(
        requests[0]
            .headers
            .iter()
            .any(|(k, v)| *k == header && *v == value),
        "{requests:?}"
    );
}

#[then(expr = "the review API should have been called with query {string} set to {string}")]
async fn api_called_with_query(world: &mut HomeworkBotWorld, key: String, value: String) {
    let requests = recorded(world, "GET").await;
    assert!(
        requests
            .iter()
            .any(|r| r.params.iter().any(|(k, v)| *k == key && *v == value)),
        "{requests:?}"
    );
}

#[then(expr = "a Telegram message should have been posted to {string} for chat {string}")]
async fn telegram_posted(world: &mut HomeworkBotWorld, url: String, chat_id: String) {
    let requests = recorded(world, "POST").await;
    assert!(
        requests.iter().any(|r| r.url == url
            && r.params
                .iter()
                .any(|(k, v)| k == "chat_id" && *v == chat_id)),
        "{requests:?}"
    );
}

#[then(expr = "the posted text should be {string}")]
async fn posted_text(world: &mut HomeworkBotWorld, text: String) {
    let requests = recorded(world, "POST").await;
    let posted = requests
        .iter()
        .flat_map(|r| r.params.iter())
        .find(|(k, _)| k == "text")
        .map(|(_, v)| v.clone());
    assert_eq!(posted, Some(text));
}

#[then("the bot should stop after one cycle")]
async fn stopped_after_one_cycle(world: &mut HomeworkBotWorld) {
    assert_eq!(world.start_succeeded, Some(true));
    assert_eq!(recorded(world, "GET").await.len(), 1);
}
