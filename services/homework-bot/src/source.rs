//! Review source trait

use async_trait::async_trait;
use serde_json::Value;

/// Trait for fetching the latest review data
#[async_trait]
pub trait ReviewSource: Send + Sync + std::fmt::Debug {
    /// Fetch review data for submissions updated at or after `from_timestamp`
    /// (unix seconds). Zero means "now".
    ///
    /// Returns the decoded body without interpreting its shape; that is the job
    /// of [`crate::response::check_response`].
    async fn fetch(&self, from_timestamp: i64) -> crate::Result<Value>;
}
