//! Homework bot - review status watcher
//!
//! Polls the homework review API, detects when the status of the latest
//! submission changes, and relays a message to a Telegram chat.

pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod notifier;
pub mod practicum;
pub mod response;
pub mod source;
pub mod state;
pub mod telegram;

pub use config::{load_config, Config};
pub use error::{BotError, Result};

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::engine::Engine;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::notifier::Notifier;
use crate::practicum::PracticumClient;
use crate::source::ReviewSource;
use crate::state::PollState;
use crate::telegram::TelegramNotifier;

/// Assembles a [`HomeworkBot`] from configuration, with optional injected parts
pub struct HomeworkBotBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    source: Option<Arc<dyn ReviewSource>>,
    notifier: Option<Arc<dyn Notifier>>,
    initial_state: Option<PollState>,
    cancel: Option<CancellationToken>,
}

impl HomeworkBotBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            source: None,
            notifier: None,
            initial_state: None,
            cancel: None,
        }
    }

    /// Use this HTTP client for the production source and notifier
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_source(mut self, source: Arc<dyn ReviewSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_initial_state(mut self, state: PollState) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Build the bot. Credentials are only required for the parts that were
    /// not injected.
    pub fn build(self) -> Result<HomeworkBot> {
        let HomeworkBotBuilder {
            config,
            http,
            source,
            notifier,
            initial_state,
            cancel,
        } = self;

        let needs_credentials = source.is_none() || notifier.is_none();
        let credentials = if needs_credentials {
            Some(config.credentials()?)
        } else {
            None
        };

        let http = match (http, needs_credentials) {
            (Some(http), _) => Some(http),
            (None, true) => {
                let timeout = Duration::from_secs(config.practicum.request_timeout_seconds);
                let client: Arc<dyn HttpClient> =
                    Arc::new(ReqwestHttpClient::with_timeout(timeout)?);
                Some(client)
            }
            (None, false) => None,
        };

        let source: Arc<dyn ReviewSource> = match (source, &credentials, &http) {
            (Some(source), _, _) => source,
            (None, Some(credentials), Some(http)) => Arc::new(PracticumClient::new(
                &config.practicum,
                &credentials.practicum_token,
                Arc::clone(http),
            )),
            _ => return Err(BotError::Config("No review source available".to_string())),
        };

        let notifier: Arc<dyn Notifier> = match (notifier, &credentials, &http) {
            (Some(notifier), _, _) => notifier,
            (None, Some(credentials), Some(http)) => Arc::new(TelegramNotifier::new(
                &config.telegram,
                &credentials.telegram_token,
                &credentials.chat_id,
                Arc::clone(http),
            )),
            _ => return Err(BotError::Config("No notifier available".to_string())),
        };

        let cancel = cancel.unwrap_or_else(CancellationToken::new);
        let mut engine = Engine::new(source, notifier, &config, cancel.clone());
        if let Some(state) = initial_state {
            engine = engine.with_state(state);
        }

        Ok(HomeworkBot { engine, cancel })
    }
}

/// A fully wired bot, ready to poll
#[derive(Debug)]
pub struct HomeworkBot {
    engine: Engine,
    cancel: CancellationToken,
}

impl HomeworkBot {
    /// Token that stops the poll loop at the next sleep boundary
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the poll loop until Ctrl-C or the cancellation token fires
    pub async fn start(mut self) -> Result<()> {
        let cancel_for_signal = self.cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                    cancel_for_signal.cancel();
                }
                Err(e) => tracing::warn!("Failed to listen for ctrl-c: {}", e),
            }
        });

        tracing::info!("Homework bot started");
        self.engine.run().await;
        tracing::info!("Homework bot stopped");

        Ok(())
    }

    /// Run exactly one cycle, without sleeping
    pub async fn run_once(&mut self) -> engine::CycleOutcome {
        self.engine.run_cycle().await
    }

    pub fn state(&self) -> &PollState {
        self.engine.state()
    }
}
