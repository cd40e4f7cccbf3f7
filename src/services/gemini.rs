/// Gemini grounding client
///
/// Calls the generateContent endpoint with the Google Maps grounding tool
/// enabled, anchored at the caller's location. The trait keeps the pipeline
/// independent of the concrete backend so tests can substitute a stub.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{GenerateContentRequest, GenerateContentResponse, GeoLocation, GroundingChunk},
};

/// Raw candidate data from one grounded generation call
#[derive(Debug, Clone)]
pub struct GroundedResponse {
    /// Free text accompanying the grounded answer
    pub text: String,
    /// Structured source references attached to the answer
    pub chunks: Vec<GroundingChunk>,
}

/// Trait for grounded AI backends
///
/// One call per pipeline invocation; failures surface as `AppError::Upstream`
/// and are not retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GroundingClient: Send + Sync {
    /// Sends a prompt anchored at a location and returns raw candidate data
    async fn fetch(&self, prompt: &str, anchor: GeoLocation) -> AppResult<GroundedResponse>;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}

/// HTTP client for the Gemini generateContent API
#[derive(Clone)]
pub struct GeminiClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiClient {
    /// Creates a new client from application configuration
    ///
    /// The upstream timeout is enforced here; a timed-out call surfaces as an
    /// upstream error like any other failure.
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.gemini_api_key.clone(),
            api_url: config.gemini_api_url.clone(),
            model: config.gemini_model.clone(),
        })
    }
}

#[async_trait::async_trait]
impl GroundingClient for GeminiClient {
    async fn fetch(&self, prompt: &str, anchor: GeoLocation) -> AppResult<GroundedResponse> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.model
        );

        let request = GenerateContentRequest::grounded(prompt.to_string(), anchor);

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Upstream("Gemini API call timed out".to_string())
                } else {
                    AppError::Upstream(format!("Gemini API call failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        tracing::debug!(response = %response_text, "Raw Gemini API response");

        let parsed: GenerateContentResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                tracing::error!(
                    error = %e,
                    response = %response_text,
                    "Failed to deserialize Gemini response"
                );
                AppError::Upstream(format!("Failed to parse Gemini response: {}", e))
            })?;

        if parsed.candidates.is_empty() {
            return Err(AppError::Upstream(
                "No candidates returned from Gemini".to_string(),
            ));
        }

        let text = parsed.text();
        let chunks = parsed.grounding_chunks();

        tracing::info!(
            chunks = chunks.len(),
            text_len = text.len(),
            backend = self.name(),
            "Grounded response fetched"
        );

        Ok(GroundedResponse { text, chunks })
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
