//! Notifier trait for sending chat messages

use async_trait::async_trait;

/// Trait for delivering plain-text messages to the configured chat
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "telegram")
    fn type_name(&self) -> &str;

    /// Deliver a message
    async fn notify(&self, message: &str) -> crate::Result<()>;
}

/// Deliver `message`, turning any failure into [`crate::BotError::Delivery`]
/// that carries the original text.
pub async fn send_message(notifier: &dyn Notifier, message: &str) -> crate::Result<()> {
    match notifier.notify(message).await {
        Ok(()) => {
            tracing::info!("Bot sent message \"{}\"", message);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "Failed to send message \"{}\" via '{}': {}",
                message,
                notifier.type_name(),
                e
            );
            Err(crate::BotError::Delivery {
                message: message.to_string(),
                reason: e.to_string(),
            })
        }
    }
}
