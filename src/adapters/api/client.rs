//! Hyperliquid HTTP Client - Timeouts and Bounded Read Retries
//!
//! Wraps reqwest for the two exchange endpoints. `/info` reads are
//! idempotent and retried with exponential backoff on transient
//! failures; `/exchange` writes are submitted exactly once - retrying
//! a signed order blindly risks a duplicate fill.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::errors::ApiError;

/// HTTP status codes treated as transient for read retries.
const RETRYABLE_STATUS: &[u16] = &[429, 502, 503, 504];

/// Base delay between read retries (doubles with each attempt).
const RETRY_BASE_DELAY: Duration = Duration::from_millis(200);

/// Shared HTTP client for the Hyperliquid REST API.
pub struct ApiClient {
    http: Client,
    base_url: String,
    info_retries: u32,
}

impl ApiClient {
    /// Build the client with the configured timeout.
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: settings.network.base_url().to_string(),
            info_retries: settings.info_retries,
        })
    }

    /// POST to `/info` and decode the JSON response.
    ///
    /// Retries transient failures up to the configured budget.
    pub async fn info<B, T>(&self, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_string(body)
            .map_err(|e| ApiError::Decode(format!("info request encoding: {e}")))?;

        let mut last_error = ApiError::Transport("no attempt made".to_string());

        for attempt in 0..=self.info_retries {
            if attempt > 0 {
                let delay = RETRY_BASE_DELAY * 2u32.pow(attempt - 1);
                debug!(attempt, delay_ms = delay.as_millis() as u64, "Retrying info request");
                sleep(delay).await;
            }

            match self.post_once("/info", &payload).await {
                Ok(text) => {
                    return serde_json::from_str(&text)
                        .map_err(|e| ApiError::Decode(e.to_string()));
                }
                Err(error) if is_retryable(&error) => {
                    warn!(error = %error, attempt, "Transient info failure");
                    last_error = error;
                }
                Err(error) => return Err(error),
            }
        }

        Err(last_error)
    }

    /// POST a signed payload to `/exchange`. Exactly one attempt.
    pub async fn exchange<B, T>(&self, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_string(body)
            .map_err(|e| ApiError::Decode(format!("exchange request encoding: {e}")))?;

        // Not logging the payload: it contains a signature.
        debug!("Submitting exchange request");
        let text = self.post_once("/exchange", &payload).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn post_once(&self, path: &str, payload: &str) -> Result<String, ApiError> {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .body(payload.to_string())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::OK {
            return Ok(text);
        }

        Err(ApiError::Http {
            status: status.as_u16(),
            body: text,
        })
    }
}

fn is_retryable(error: &ApiError) -> bool {
    match error {
        ApiError::Transport(_) => true,
        ApiError::Http { status, .. } => RETRYABLE_STATUS.contains(status),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(is_retryable(&ApiError::Transport("timed out".to_string())));
        assert!(is_retryable(&ApiError::Http {
            status: 503,
            body: String::new()
        }));
        assert!(!is_retryable(&ApiError::Http {
            status: 422,
            body: String::new()
        }));
        assert!(!is_retryable(&ApiError::Decode("bad json".to_string())));
    }
}
