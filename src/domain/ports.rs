use crate::domain::model::InferenceOutcome;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the inference client reacts to a busy (503) endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Wait with exponential backoff and retry until `max_retries` attempts are spent.
    #[default]
    Backoff,
    /// Report the first busy response without retrying.
    FailFast,
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn api_token(&self) -> &str;
    fn max_retries(&self) -> u32;
    fn retry_delay(&self) -> Duration;
    fn retry_policy(&self) -> RetryPolicy;
    fn request_timeout(&self) -> Option<Duration>;
}

/// Anything that can turn a prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<InferenceOutcome>;
}
