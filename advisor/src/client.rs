//! Messages API client

use crate::{
    error::AdvisorError,
    messages::{MessagesRequest, MessagesResponse},
};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Production endpoint
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1";

const API_VERSION: &str = "2023-06-01";

/// Messages API client
#[derive(Clone)]
pub struct AdvisorClient {
    client: Client,
    api_key: String,
    api_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for AdvisorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisorClient")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl AdvisorClient {
    /// Create a new client with API key from environment
    ///
    /// # Errors
    ///
    /// Returns `AdvisorError::MissingApiKey` if `ANTHROPIC_API_KEY` is unset or blank
    pub fn from_env() -> Result<Self, AdvisorError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(AdvisorError::MissingApiKey)?;

        Ok(Self::new(api_key))
    }

    /// Create a new client with explicit API key
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Builder: point at a different base URL (trailing slash ignored)
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder: per-request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create a message (non-streaming)
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn messages(&self, request: MessagesRequest) -> Result<MessagesResponse, AdvisorError> {
        tracing::debug!(model = %request.model, "Sending messages request");

        let response = self
            .client
            .post(format!("{}/messages", self.api_url))
            .timeout(self.timeout)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AdvisorError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<MessagesResponse>()
                .await
                .map_err(|e| AdvisorError::ResponseParseFailed(e.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(AdvisorError::RateLimited),
            StatusCode::UNAUTHORIZED => Err(AdvisorError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AdvisorError::ApiError {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }
}
