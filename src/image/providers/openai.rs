//! OpenAI image generation provider (dall-e-3, dall-e-2).

use crate::error::{PixelforgeError, Result};
use crate::image::provider::ImageProvider;
use crate::image::types::{GeneratedImage, GenerationRequest, VendorKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const GENERATIONS_URL: &str = "https://api.openai.com/v1/images/generations";

/// Builder for OpenAiProvider.
#[derive(Debug, Clone, Default)]
pub struct OpenAiProviderBuilder {
    api_key: Option<String>,
}

impl OpenAiProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `OPENAI_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builds the provider, resolving the API key.
    pub fn build(self) -> Result<OpenAiProvider> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| PixelforgeError::Config("OpenAI API key not configured".into()))?;

        Ok(OpenAiProvider {
            client: reqwest::Client::new(),
            api_key,
        })
    }
}

/// OpenAI image generation provider.
///
/// The model identifier from the request (`dall-e-3` or `dall-e-2`) is
/// forwarded upstream as-is; both variants share this client.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiProvider {
    /// Creates a new `OpenAiProviderBuilder`.
    pub fn builder() -> OpenAiProviderBuilder {
        OpenAiProviderBuilder::new()
    }

    fn parse_error(&self, status: u16, text: &str) -> PixelforgeError {
        let message = serde_json::from_str::<OpenAiErrorEnvelope>(text)
            .ok()
            .map(|e| e.error.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Failed to generate images with DALL-E".to_string());
        PixelforgeError::Upstream { status, message }
    }
}

#[async_trait]
impl ImageProvider for OpenAiProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<GeneratedImage>> {
        let body = OpenAiImageRequest::from_generation_request(request);

        tracing::debug!(model = %request.model, n = body.n, "calling OpenAI images endpoint");

        let response = self
            .client
            .post(GENERATIONS_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(self.parse_error(status.as_u16(), &text));
        }

        let openai_response: OpenAiImageResponse = response.json().await?;

        if openai_response.data.is_empty() {
            return Err(PixelforgeError::UnexpectedResponse(
                "No images in OpenAI response".into(),
            ));
        }

        // Entries carry either a hosted url or inline b64_json; both
        // normalize to a url string.
        openai_response
            .data
            .into_iter()
            .map(|entry| {
                if let Some(url) = entry.url {
                    Ok(GeneratedImage::from_url(url))
                } else if let Some(b64) = entry.b64_json {
                    GeneratedImage::from_base64_checked("image/png", &b64)
                } else {
                    Err(PixelforgeError::UnexpectedResponse(
                        "OpenAI image entry contained no url or b64_json".into(),
                    ))
                }
            })
            .collect()
    }

    fn kind(&self) -> VendorKind {
        VendorKind::OpenAi
    }
}

#[derive(Debug, Serialize)]
struct OpenAiImageRequest {
    model: String,
    prompt: String,
    n: u32,
    size: &'static str,
    quality: &'static str,
    style: &'static str,
}

impl OpenAiImageRequest {
    fn from_generation_request(req: &GenerationRequest) -> Self {
        Self {
            model: req.model.as_str().to_string(),
            prompt: req.combined_prompt(),
            n: req.num_images,
            size: "1024x1024",
            quality: "standard",
            style: "natural",
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiImageResponse {
    #[serde(default)]
    data: Vec<OpenAiImageData>,
}

#[derive(Debug, Deserialize)]
struct OpenAiImageData {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorEnvelope {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    #[serde(default)]
    message: String,
}
