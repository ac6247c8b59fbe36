//! Client for the external image/video generation service.
//!
//! The service exposes two endpoints that each return the URL of the
//! produced asset:
//!
//! - `POST {api_url}/images` with `{ "prompt", "serviceId" }`
//! - `POST {api_url}/videos` with `{ "imageUrl", "prompt", "serviceId" }`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors from the generation service.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Generation API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The service answered without a usable asset URL.
    #[error("Generation API returned no asset URL")]
    MissingUrl,

    #[error("No generation service is configured")]
    Unconfigured,
}

/// Produces media assets for prompts.
#[async_trait]
pub trait MediaGenerator: Send + Sync {
    /// Generate an image and return its URL.
    async fn generate_image(&self, prompt: &str, service_id: &str)
        -> Result<String, GenerationError>;

    /// Animate an existing image and return the video URL.
    async fn generate_video(
        &self,
        image_url: &str,
        prompt: &str,
        service_id: &str,
    ) -> Result<String, GenerationError>;
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageRequest<'a> {
    prompt: &'a str,
    service_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoRequest<'a> {
    image_url: &'a str,
    prompt: &'a str,
    service_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct AssetResponse {
    #[serde(default)]
    url: Option<String>,
}

/// [`MediaGenerator`] backed by the generation service's REST API.
pub struct HttpMediaGenerator {
    client: reqwest::Client,
    api_url: String,
}

impl HttpMediaGenerator {
    /// * `api_url` - Base HTTP URL, e.g. `http://host:9000`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Reuse an existing [`reqwest::Client`] (timeouts, pooling).
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    async fn post_for_url<B: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(format!("{}/{endpoint}", self.api_url))
            .json(body)
            .send()
            .await?;

        let asset: AssetResponse = Self::parse_response(response).await?;
        asset
            .url
            .filter(|u| !u.trim().is_empty())
            .ok_or(GenerationError::MissingUrl)
    }

    // ---- private helpers ----

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GenerationError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GenerationError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl MediaGenerator for HttpMediaGenerator {
    async fn generate_image(
        &self,
        prompt: &str,
        service_id: &str,
    ) -> Result<String, GenerationError> {
        self.post_for_url("images", &ImageRequest { prompt, service_id })
            .await
    }

    async fn generate_video(
        &self,
        image_url: &str,
        prompt: &str,
        service_id: &str,
    ) -> Result<String, GenerationError> {
        self.post_for_url(
            "videos",
            &VideoRequest {
                image_url,
                prompt,
                service_id,
            },
        )
        .await
    }
}

/// Generator used when no service URL is configured. Every call fails.
#[derive(Debug, Default)]
pub struct UnconfiguredGenerator;

#[async_trait]
impl MediaGenerator for UnconfiguredGenerator {
    async fn generate_image(&self, _: &str, _: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Unconfigured)
    }

    async fn generate_video(&self, _: &str, _: &str, _: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Unconfigured)
    }
}
