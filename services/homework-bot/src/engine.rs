//! Engine: the fetch, validate, notify poll loop

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::notifier::{send_message, Notifier};
use crate::practicum::current_unix_seconds;
use crate::response::{check_response, parse_status};
use crate::source::ReviewSource;
use crate::state::PollState;
use crate::BotError;

/// What a single cycle ended with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The status message changed and was delivered
    Notified(String),
    /// The status message matches the last delivered one
    Unchanged,
    /// Some step failed; `reported` is true when the diagnostic reached the chat
    Failed { diagnostic: String, reported: bool },
}

/// The engine polls the review source and relays status changes
#[derive(Debug)]
pub struct Engine {
    source: Arc<dyn ReviewSource>,
    notifier: Arc<dyn Notifier>,
    state: PollState,
    retry_interval: Duration,
    cancel: CancellationToken,
}

impl Engine {
    pub fn new(
        source: Arc<dyn ReviewSource>,
        notifier: Arc<dyn Notifier>,
        config: &Config,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            source,
            notifier,
            state: PollState::new(current_unix_seconds()),
            retry_interval: Duration::from_secs(config.polling.retry_interval_seconds),
            cancel,
        }
    }

    /// Replace the initial state (mainly to pin the starting cursor)
    pub fn with_state(mut self, state: PollState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Run cycles until the cancellation token is triggered. Each cycle is
    /// followed by the fixed retry interval whatever its outcome.
    pub async fn run(&mut self) {
        tracing::info!(
            "Polling every {}s starting from {}",
            self.retry_interval.as_secs(),
            self.state.cursor_timestamp
        );

        loop {
            let outcome = self.run_cycle().await;
            tracing::debug!(
                "Cycle finished: {:?}, cursor={}",
                outcome,
                self.state.cursor_timestamp
            );

            tokio::select! {
                _ = tokio::time::sleep(self.retry_interval) => {}
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Poll loop cancelled");
                    break;
                }
            }
        }
    }

    /// Run one fetch, validate, extract, notify cycle. Never fails: errors are
    /// reported to the chat (once per distinct diagnostic) and returned as
    /// [`CycleOutcome::Failed`].
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.poll_once().await {
            Ok(outcome) => outcome,
            Err(e) => self.report_failure(&e).await,
        }
    }

    async fn poll_once(&mut self) -> crate::Result<CycleOutcome> {
        let body = self.source.fetch(self.state.cursor_timestamp).await?;
        let snapshot = check_response(&body)?;
        let message = parse_status(snapshot.homework)?;
        self.state.advance_cursor(snapshot.current_date);

        if !self.state.is_new_status(&message) {
            tracing::debug!("Status unchanged: {}", message);
            return Ok(CycleOutcome::Unchanged);
        }

        send_message(self.notifier.as_ref(), &message).await?;
        self.state.record_notified(&message);
        Ok(CycleOutcome::Notified(message))
    }

    async fn report_failure(&mut self, err: &BotError) -> CycleOutcome {
        let diagnostic = diagnostic_message(err);
        tracing::error!("{}", diagnostic);

        if !self.state.is_new_error(&diagnostic) {
            tracing::debug!("Same failure as last cycle, not reporting again");
            return CycleOutcome::Failed {
                diagnostic,
                reported: false,
            };
        }

        let reported = send_message(self.notifier.as_ref(), &diagnostic)
            .await
            .is_ok();
        self.state.record_error(&diagnostic);

        CycleOutcome::Failed {
            diagnostic,
            reported,
        }
    }
}

/// The chat text for a failed cycle
pub fn diagnostic_message(err: &BotError) -> String {
    format!("Сбой в работе программы: {}", err)
}
