use crate::domain::model::InferenceOutcome;
use crate::domain::ports::{ConfigProvider, RetryPolicy, TextGenerator};
use crate::utils::error::{AssistantError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/tiiuae/falcon-7b-instruct";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_WAIT_SECONDS: u64 = 10;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Client for a hosted text-generation model.
pub struct InferenceClient {
    endpoint: String,
    api_token: String,
    max_retries: u32,
    retry_delay: Duration,
    retry_policy: RetryPolicy,
    timeout: Option<Duration>,
    client: Client,
}

impl InferenceClient {
    pub fn new(endpoint: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_token: api_token.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_secs(DEFAULT_WAIT_SECONDS),
            retry_policy: RetryPolicy::default(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)),
            client: Client::new(),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let client = Client::builder().build()?;

        Ok(Self {
            endpoint: config.endpoint().to_string(),
            api_token: config.api_token().to_string(),
            max_retries: config.max_retries().max(1),
            retry_delay: config.retry_delay(),
            retry_policy: config.retry_policy(),
            timeout: config.request_timeout(),
            client,
        })
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Per-request timeout; `None` waits for the server indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends `prompt` and classifies the reply.
    ///
    /// A 200 returns the first `generated_text`; a 503 is retried with
    /// exponential backoff (or reported at once under [`RetryPolicy::FailFast`]);
    /// every other status is returned as [`InferenceOutcome::Error`] without retrying.
    pub async fn query(&self, prompt: &str) -> Result<InferenceOutcome> {
        let payload = InferenceRequest { inputs: prompt };

        for attempt in 1..=self.max_retries {
            if attempt > 1 {
                let backoff = self.backoff_for(attempt);
                tracing::warn!(
                    "⏳ Model busy, retrying in {:?} (attempt {}/{})",
                    backoff,
                    attempt,
                    self.max_retries
                );
                tokio::time::sleep(backoff).await;
            }

            tracing::debug!("Sending inference request to: {}", self.endpoint);
            let mut request = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_token)
                .json(&payload);
            if let Some(timeout) = self.timeout {
                request = request.timeout(timeout);
            }
            let response = request.send().await?;

            let status = response.status();
            tracing::debug!("Inference response status: {}", status);

            match status.as_u16() {
                200 => {
                    let body = match response.json::<serde_json::Value>().await {
                        Ok(body) => body,
                        Err(e) => {
                            tracing::warn!("Inference response was not valid JSON: {}", e);
                            return Err(AssistantError::EmptyResponse);
                        }
                    };
                    return extract_generated_text(&body).map(InferenceOutcome::Success);
                }
                503 => {
                    if self.retry_policy == RetryPolicy::FailFast {
                        return Ok(InferenceOutcome::Busy {
                            attempt,
                            max_retries: self.max_retries,
                        });
                    }
                }
                _ => {
                    let payload = response.text().await.unwrap_or_default();
                    tracing::warn!("Inference request failed with status {}", status);
                    return Ok(InferenceOutcome::Error {
                        status: status.as_u16(),
                        payload,
                    });
                }
            }
        }

        tracing::warn!(
            "❌ Model still busy after {} attempts, giving up",
            self.max_retries
        );
        Ok(InferenceOutcome::Unavailable {
            attempts: self.max_retries,
        })
    }

    /// Delay before `attempt` (2-based): retry_delay, 2x, 4x, ...
    fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(2).min(16);
        self.retry_delay.saturating_mul(1u32 << exponent)
    }
}

#[async_trait]
impl TextGenerator for InferenceClient {
    async fn generate(&self, prompt: &str) -> Result<InferenceOutcome> {
        self.query(prompt).await
    }
}

/// 取出回應陣列第一個元素的 `generated_text`
fn extract_generated_text(body: &serde_json::Value) -> Result<String> {
    body.get(0)
        .and_then(|first| first.get("generated_text"))
        .and_then(|text| text.as_str())
        .map(str::to_string)
        .ok_or(AssistantError::EmptyResponse)
}
