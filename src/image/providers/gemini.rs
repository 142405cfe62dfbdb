//! Gemini (Google) image generation provider.

use crate::error::{PixelforgeError, Result};
use crate::image::provider::ImageProvider;
use crate::image::types::{GeneratedImage, GenerationRequest, VendorKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const MODEL: &str = "gemini-2.5-flash-image";

/// Builder for GeminiProvider.
#[derive(Debug, Clone, Default)]
pub struct GeminiProviderBuilder {
    api_key: Option<String>,
}

impl GeminiProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `GOOGLE_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builds the provider, resolving the API key.
    pub fn build(self) -> Result<GeminiProvider> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or_else(|| PixelforgeError::Config("Google API key not configured".into()))?;

        Ok(GeminiProvider {
            client: reqwest::Client::new(),
            api_key,
        })
    }
}

/// Gemini image generation provider.
///
/// Uses the generateContent call with an IMAGE response modality and decodes
/// the returned `inlineData` parts. Gemini produces one image per call
/// regardless of the requested count.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
}

impl GeminiProvider {
    /// Creates a new `GeminiProviderBuilder`.
    pub fn builder() -> GeminiProviderBuilder {
        GeminiProviderBuilder::new()
    }

    fn parse_error(&self, status: u16, text: &str) -> PixelforgeError {
        let message = serde_json::from_str::<GeminiErrorEnvelope>(text)
            .ok()
            .map(|e| e.error.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Failed to generate image".to_string());
        PixelforgeError::Upstream { status, message }
    }
}

#[async_trait]
impl ImageProvider for GeminiProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<GeneratedImage>> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            MODEL,
        );

        let body = GeminiRequest::from_generation_request(request);

        tracing::debug!(model = MODEL, "calling Gemini generateContent endpoint");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(self.parse_error(status.as_u16(), &text));
        }

        let gemini_response: GeminiResponse = response.json().await?;

        let candidate = gemini_response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| PixelforgeError::Upstream {
                status: 200,
                message: "Failed to generate image".into(),
            })?;

        let images: Vec<GeneratedImage> = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.inline_data)
            .map(|inline| GeneratedImage::from_base64_checked(&inline.mime_type, &inline.data))
            .collect::<Result<_>>()?;

        if images.is_empty() {
            return Err(PixelforgeError::Upstream {
                status: 200,
                message: "Failed to generate image".into(),
            });
        }

        Ok(images)
    }

    fn kind(&self) -> VendorKind {
        VendorKind::Gemini
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

#[derive(Debug, Serialize)]
struct GeminiRequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    response_modalities: Vec<String>,
}

impl GeminiRequest {
    fn from_generation_request(req: &GenerationRequest) -> Self {
        // Gemini takes a single text prompt; the negative prompt folds in
        // the same way as for DALL-E.
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiRequestPart {
                    text: req.combined_prompt(),
                }],
            }],
            generation_config: GeminiConfig {
                response_modalities: vec!["IMAGE".to_string()],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: String,
}
