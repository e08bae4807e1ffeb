//! Yandex Practicum homework status API client

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde_json::Value;

use crate::config::PracticumConfig;
use crate::io::HttpClient;
use crate::source::ReviewSource;

/// Client for the homework review status endpoint
pub struct PracticumClient {
    endpoint: String,
    auth_header: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl PracticumClient {
    pub fn new(config: &PracticumConfig, token: &str, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!("Created PracticumClient for {}", config.endpoint);

        Self {
            endpoint: config.endpoint.clone(),
            auth_header: format!("OAuth {}", token),
            http,
        }
    }
}

#[async_trait]
impl ReviewSource for PracticumClient {
    async fn fetch(&self, from_timestamp: i64) -> crate::Result<Value> {
        let timestamp = if from_timestamp > 0 {
            from_timestamp
        } else {
            current_unix_seconds()
        };
        let from_date = timestamp.to_string();
        tracing::debug!("Fetching {} from_date={}", self.endpoint, from_date);

        let response = self
            .http
            .get(
                &self.endpoint,
                &[("Authorization", self.auth_header.as_str())],
                &[("from_date", from_date.as_str())],
            )
            .await
            .inspect_err(|e| tracing::error!("Request to {} failed: {}", self.endpoint, e))?;

        if response.status != 200 {
            tracing::error!(
                "Endpoint {} unavailable: status={}",
                self.endpoint,
                response.status
            );
            return Err(crate::BotError::EndpointUnavailable {
                url: self.endpoint.clone(),
                status: response.status,
            });
        }

        serde_json::from_str::<Value>(&response.body).map_err(|e| {
            tracing::error!("Failed to decode response from {}: {}", self.endpoint, e);
            crate::BotError::Transport(format!("Некорректный JSON в ответе API: {}", e))
        })
    }
}

/// Current wall-clock time in unix seconds
pub fn current_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
