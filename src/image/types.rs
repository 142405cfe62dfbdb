//! Core types for image generation.

use crate::error::{PixelforgeError, Result};
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// Vendors return both padded and unpadded base64 payloads.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &base64::alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// The closed set of supported model identifiers.
///
/// Anything outside this set is rejected at the boundary with an
/// unknown-model error; vendors are selected by matching this enum, never
/// by inspecting raw strings downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelId {
    /// OpenAI DALL-E 3.
    #[serde(rename = "dall-e-3")]
    DallE3,
    /// OpenAI DALL-E 2.
    #[serde(rename = "dall-e-2")]
    DallE2,
    /// Stability AI SDXL.
    #[serde(rename = "stable-diffusion")]
    StableDiffusion,
    /// Google Gemini image generation.
    #[serde(rename = "gemini")]
    Gemini,
}

impl ModelId {
    /// Returns the wire identifier for this model.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DallE3 => "dall-e-3",
            Self::DallE2 => "dall-e-2",
            Self::StableDiffusion => "stable-diffusion",
            Self::Gemini => "gemini",
        }
    }

    /// Returns the vendor this model belongs to.
    pub fn vendor(&self) -> VendorKind {
        match self {
            Self::DallE3 | Self::DallE2 => VendorKind::OpenAi,
            Self::StableDiffusion => VendorKind::Stability,
            Self::Gemini => VendorKind::Gemini,
        }
    }
}

impl FromStr for ModelId {
    type Err = PixelforgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dall-e-3" => Ok(Self::DallE3),
            "dall-e-2" => Ok(Self::DallE2),
            "stable-diffusion" => Ok(Self::StableDiffusion),
            "gemini" => Ok(Self::Gemini),
            other => Err(PixelforgeError::UnknownModel(other.to_string())),
        }
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Image vendor kind, one per upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorKind {
    /// OpenAI image models (DALL-E).
    OpenAi,
    /// Stability AI (SDXL).
    Stability,
    /// Google Gemini image models.
    Gemini,
}

impl VendorKind {
    /// Human-readable vendor name for listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI (DALL-E)",
            Self::Stability => "Stability AI (SDXL)",
            Self::Gemini => "Gemini (Google)",
        }
    }
}

impl std::fmt::Display for VendorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Stability => write!(f, "stability"),
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

/// A normalized request to generate one or more images.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// The text prompt describing the desired image.
    pub prompt: String,
    /// Things the image should avoid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// Number of images to generate (at least 1).
    pub num_images: u32,
    /// Which model to generate with.
    pub model: ModelId,
}

impl GenerationRequest {
    /// Creates a new single-image request for the given model.
    pub fn new(prompt: impl Into<String>, model: ModelId) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: None,
            num_images: 1,
            model,
        }
    }

    /// Sets the negative prompt.
    pub fn with_negative_prompt(mut self, negative: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative.into());
        self
    }

    /// Sets the number of images, floored at 1.
    pub fn with_num_images(mut self, n: u32) -> Self {
        self.num_images = n.max(1);
        self
    }

    /// The prompt with the negative prompt folded in, for vendors that take
    /// a single prompt string (OpenAI).
    pub fn combined_prompt(&self) -> String {
        match &self.negative_prompt {
            Some(negative) => format!("{}. Avoid: {}", self.prompt, negative),
            None => self.prompt.clone(),
        }
    }
}

/// A single generated image reference: a remote URL or a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Remote HTTP URL, or a data URI embedding the image bytes.
    pub url: String,
}

impl GeneratedImage {
    /// Wraps a remote URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Wraps already-encoded base64 image data as a data URI.
    pub fn from_base64(mime_type: &str, base64_data: &str) -> Self {
        Self {
            url: format!("data:{};base64,{}", mime_type, base64_data),
        }
    }

    /// Like [`from_base64`](Self::from_base64), but first checks that the
    /// payload actually decodes, so a malformed vendor payload surfaces as
    /// a decode error instead of a broken data URI.
    pub fn from_base64_checked(mime_type: &str, base64_data: &str) -> Result<Self> {
        BASE64
            .decode(base64_data)
            .map_err(|e| PixelforgeError::Decode(e.to_string()))?;
        Ok(Self::from_base64(mime_type, base64_data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_id_round_trip() {
        for id in [
            ModelId::DallE3,
            ModelId::DallE2,
            ModelId::StableDiffusion,
            ModelId::Gemini,
        ] {
            assert_eq!(id.as_str().parse::<ModelId>().unwrap(), id);
        }
    }

    #[test]
    fn test_model_id_rejects_unknown() {
        assert!("midjourney".parse::<ModelId>().is_err());
        assert!("dall-e".parse::<ModelId>().is_err());
        assert!("".parse::<ModelId>().is_err());
    }

    #[test]
    fn test_vendor_display_names() {
        assert_eq!(VendorKind::OpenAi.display_name(), "OpenAI (DALL-E)");
        assert_eq!(VendorKind::Stability.display_name(), "Stability AI (SDXL)");
        assert_eq!(VendorKind::Gemini.display_name(), "Gemini (Google)");
    }

    #[test]
    fn test_model_vendor_mapping() {
        assert_eq!(ModelId::DallE3.vendor(), VendorKind::OpenAi);
        assert_eq!(ModelId::DallE2.vendor(), VendorKind::OpenAi);
        assert_eq!(ModelId::StableDiffusion.vendor(), VendorKind::Stability);
        assert_eq!(ModelId::Gemini.vendor(), VendorKind::Gemini);
    }

    #[test]
    fn test_combined_prompt_with_negative() {
        let req = GenerationRequest::new("a red fox", ModelId::DallE3)
            .with_negative_prompt("blurry");
        assert_eq!(req.combined_prompt(), "a red fox. Avoid: blurry");
    }

    #[test]
    fn test_combined_prompt_without_negative() {
        let req = GenerationRequest::new("a red fox", ModelId::DallE3);
        assert_eq!(req.combined_prompt(), "a red fox");
    }

    #[test]
    fn test_num_images_floor() {
        let req = GenerationRequest::new("x", ModelId::DallE2).with_num_images(0);
        assert_eq!(req.num_images, 1);
        let req = GenerationRequest::new("x", ModelId::DallE2).with_num_images(4);
        assert_eq!(req.num_images, 4);
    }

    #[test]
    fn test_data_uri_construction() {
        let img = GeneratedImage::from_base64("image/png", "AAA");
        assert_eq!(img.url, "data:image/png;base64,AAA");
    }

    #[test]
    fn test_checked_data_uri_accepts_valid_payloads() {
        // Unpadded and padded forms both occur in vendor responses.
        let img = GeneratedImage::from_base64_checked("image/png", "AAA").unwrap();
        assert_eq!(img.url, "data:image/png;base64,AAA");

        let img = GeneratedImage::from_base64_checked("image/png", "iVBORw0KGgo=").unwrap();
        assert_eq!(img.url, "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_checked_data_uri_rejects_malformed_payload() {
        let err = GeneratedImage::from_base64_checked("image/png", "!!not base64!!").unwrap_err();
        assert!(matches!(err, PixelforgeError::Decode(_)));
    }

    #[test]
    fn test_request_serde_camel_case() {
        let req = GenerationRequest::new("a cat", ModelId::StableDiffusion)
            .with_negative_prompt("dogs")
            .with_num_images(2);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "stable-diffusion");
        assert_eq!(json["negativePrompt"], "dogs");
        assert_eq!(json["numImages"], 2);
    }
}
