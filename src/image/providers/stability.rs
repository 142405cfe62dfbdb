//! Stability AI text-to-image provider (SDXL).

use crate::error::{PixelforgeError, Result};
use crate::image::provider::ImageProvider;
use crate::image::types::{GeneratedImage, GenerationRequest, VendorKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const API_HOST: &str = "https://api.stability.ai";
const ENGINE: &str = "stable-diffusion-xl-1024-v1-0";

/// Builder for StabilityProvider.
#[derive(Debug, Clone, Default)]
pub struct StabilityProviderBuilder {
    api_key: Option<String>,
}

impl StabilityProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `STABILITY_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builds the provider, resolving the API key.
    pub fn build(self) -> Result<StabilityProvider> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("STABILITY_API_KEY").ok())
            .ok_or_else(|| PixelforgeError::Config("Stability API key not configured".into()))?;

        Ok(StabilityProvider {
            client: reqwest::Client::new(),
            api_key,
        })
    }
}

/// Stability AI text-to-image provider.
pub struct StabilityProvider {
    client: reqwest::Client,
    api_key: String,
}

impl StabilityProvider {
    /// Creates a new `StabilityProviderBuilder`.
    pub fn builder() -> StabilityProviderBuilder {
        StabilityProviderBuilder::new()
    }

    fn parse_error(&self, status: u16, text: &str) -> PixelforgeError {
        let message = serde_json::from_str::<StabilityErrorBody>(text)
            .ok()
            .and_then(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Failed to generate images with Stable Diffusion".to_string());
        PixelforgeError::Upstream { status, message }
    }
}

#[async_trait]
impl ImageProvider for StabilityProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<GeneratedImage>> {
        let body = StabilityRequest::from_generation_request(request);

        tracing::debug!(samples = body.samples, "calling Stability text-to-image endpoint");

        let url = format!("{}/v1/generation/{}/text-to-image", API_HOST, ENGINE);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(self.parse_error(status.as_u16(), &text));
        }

        let stability_response: StabilityResponse = response.json().await?;

        if stability_response.artifacts.is_empty() {
            return Err(PixelforgeError::UnexpectedResponse(
                "No artifacts in Stability response".into(),
            ));
        }

        stability_response
            .artifacts
            .into_iter()
            .map(|artifact| GeneratedImage::from_base64_checked("image/png", &artifact.base64))
            .collect()
    }

    fn kind(&self) -> VendorKind {
        VendorKind::Stability
    }
}

#[derive(Debug, Serialize)]
struct StabilityRequest {
    text_prompts: Vec<TextPrompt>,
    cfg_scale: u32,
    height: u32,
    width: u32,
    samples: u32,
    steps: u32,
    style_preset: &'static str,
}

#[derive(Debug, Serialize)]
struct TextPrompt {
    text: String,
    weight: i32,
}

impl StabilityRequest {
    fn from_generation_request(req: &GenerationRequest) -> Self {
        let mut text_prompts = vec![TextPrompt {
            text: req.prompt.clone(),
            weight: 1,
        }];
        if let Some(negative) = &req.negative_prompt {
            text_prompts.push(TextPrompt {
                text: negative.clone(),
                weight: -1,
            });
        }

        Self {
            text_prompts,
            cfg_scale: 7,
            height: 1024,
            width: 1024,
            samples: req.num_images,
            steps: 30,
            style_preset: "photographic",
        }
    }
}

#[derive(Debug, Deserialize)]
struct StabilityResponse {
    #[serde(default)]
    artifacts: Vec<StabilityArtifact>,
}

#[derive(Debug, Deserialize)]
struct StabilityArtifact {
    base64: String,
    #[serde(default)]
    #[allow(dead_code)]
    seed: Option<u64>,
    #[serde(default, rename = "finishReason")]
    #[allow(dead_code)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StabilityErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::types::ModelId;

    #[test]
    fn test_builder_with_explicit_key() {
        let provider = StabilityProviderBuilder::new().api_key("sk-test").build();
        assert!(provider.is_ok());
    }

    #[test]
    fn test_weighted_prompts_with_negative() {
        let req = GenerationRequest::new("a mountain lake", ModelId::StableDiffusion)
            .with_negative_prompt("people");
        let body = StabilityRequest::from_generation_request(&req);

        assert_eq!(body.text_prompts.len(), 2);
        assert_eq!(body.text_prompts[0].text, "a mountain lake");
        assert_eq!(body.text_prompts[0].weight, 1);
        assert_eq!(body.text_prompts[1].text, "people");
        assert_eq!(body.text_prompts[1].weight, -1);
    }

    #[test]
    fn test_weighted_prompts_without_negative() {
        let req = GenerationRequest::new("a mountain lake", ModelId::StableDiffusion);
        let body = StabilityRequest::from_generation_request(&req);

        assert_eq!(body.text_prompts.len(), 1);
        assert_eq!(body.text_prompts[0].weight, 1);
    }

    #[test]
    fn test_fixed_generation_parameters() {
        let req = GenerationRequest::new("x", ModelId::StableDiffusion).with_num_images(3);
        let body = StabilityRequest::from_generation_request(&req);

        assert_eq!(body.cfg_scale, 7);
        assert_eq!(body.height, 1024);
        assert_eq!(body.width, 1024);
        assert_eq!(body.samples, 3);
        assert_eq!(body.steps, 30);
        assert_eq!(body.style_preset, "photographic");
    }

    #[test]
    fn test_artifacts_become_png_data_uris() {
        let json = r#"{"artifacts": [
            {"base64": "AAA", "seed": 1, "finishReason": "SUCCESS"},
            {"base64": "BBB", "seed": 2, "finishReason": "SUCCESS"}
        ]}"#;
        let resp: StabilityResponse = serde_json::from_str(json).unwrap();
        let images: Vec<GeneratedImage> = resp
            .artifacts
            .into_iter()
            .map(|a| GeneratedImage::from_base64_checked("image/png", &a.base64).unwrap())
            .collect();

        assert_eq!(images[0].url, "data:image/png;base64,AAA");
        assert_eq!(images[1].url, "data:image/png;base64,BBB");
    }

    #[test]
    fn test_malformed_artifact_payload_is_rejected() {
        let json = r#"{"artifacts": [{"base64": "!!not base64!!"}]}"#;
        let resp: StabilityResponse = serde_json::from_str(json).unwrap();
        let result: crate::error::Result<Vec<GeneratedImage>> = resp
            .artifacts
            .into_iter()
            .map(|a| GeneratedImage::from_base64_checked("image/png", &a.base64))
            .collect();

        assert!(matches!(result.unwrap_err(), PixelforgeError::Decode(_)));
    }

    #[test]
    fn test_error_message_pass_through() {
        let provider = StabilityProviderBuilder::new()
            .api_key("sk-test")
            .build()
            .unwrap();
        let err = provider.parse_error(400, r#"{"message": "Invalid prompts detected"}"#);
        match err {
            PixelforgeError::Upstream { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid prompts detected");
            }
            other => panic!("expected Upstream, got {:?}", other),
        }
    }

    #[test]
    fn test_error_default_message() {
        let provider = StabilityProviderBuilder::new()
            .api_key("sk-test")
            .build()
            .unwrap();
        let err = provider.parse_error(500, "");
        match err {
            PixelforgeError::Upstream { message, .. } => {
                assert_eq!(message, "Failed to generate images with Stable Diffusion");
            }
            other => panic!("expected Upstream, got {:?}", other),
        }
    }
}
