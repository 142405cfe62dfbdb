//! Provider registry: maps a model to the vendor that serves it.

use crate::config::Config;
use crate::error::{PixelforgeError, Result};
use crate::image::provider::ImageProvider;
use crate::image::providers::{GeminiProvider, OpenAiProvider, StabilityProvider};
use crate::image::types::{GeneratedImage, GenerationRequest, VendorKind};
use std::sync::Arc;

/// Holds one provider slot per vendor.
///
/// A slot stays empty when the vendor's API key is not configured; dispatch
/// to an empty slot fails with that vendor's configuration error while the
/// other vendors keep working. Tests substitute fakes through
/// [`with_provider`](Self::with_provider).
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    openai: Option<Arc<dyn ImageProvider>>,
    stability: Option<Arc<dyn ImageProvider>>,
    gemini: Option<Arc<dyn ImageProvider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry. Every dispatch fails until providers are
    /// installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from configuration, installing a provider for each
    /// vendor whose key is present.
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new();

        if let Some(key) = &config.openai_api_key {
            match OpenAiProvider::builder().api_key(key).build() {
                Ok(provider) => registry = registry.with_provider(Arc::new(provider)),
                Err(e) => tracing::warn!("skipping OpenAI provider: {e}"),
            }
        }
        if let Some(key) = &config.stability_api_key {
            match StabilityProvider::builder().api_key(key).build() {
                Ok(provider) => registry = registry.with_provider(Arc::new(provider)),
                Err(e) => tracing::warn!("skipping Stability provider: {e}"),
            }
        }
        if let Some(key) = &config.google_api_key {
            match GeminiProvider::builder().api_key(key).build() {
                Ok(provider) => registry = registry.with_provider(Arc::new(provider)),
                Err(e) => tracing::warn!("skipping Gemini provider: {e}"),
            }
        }

        registry
    }

    /// Installs a provider in the slot matching its kind.
    pub fn with_provider(mut self, provider: Arc<dyn ImageProvider>) -> Self {
        match provider.kind() {
            VendorKind::OpenAi => self.openai = Some(provider),
            VendorKind::Stability => self.stability = Some(provider),
            VendorKind::Gemini => self.gemini = Some(provider),
        }
        self
    }

    /// Returns whether the given vendor has a provider installed.
    pub fn is_configured(&self, vendor: VendorKind) -> bool {
        self.slot(vendor).is_some()
    }

    fn slot(&self, vendor: VendorKind) -> Option<&Arc<dyn ImageProvider>> {
        match vendor {
            VendorKind::OpenAi => self.openai.as_ref(),
            VendorKind::Stability => self.stability.as_ref(),
            VendorKind::Gemini => self.gemini.as_ref(),
        }
    }

    fn missing_key_error(vendor: VendorKind) -> PixelforgeError {
        let message = match vendor {
            VendorKind::OpenAi => "OpenAI API key not configured",
            VendorKind::Stability => "Stability API key not configured",
            VendorKind::Gemini => "Google API key not configured",
        };
        PixelforgeError::Config(message.into())
    }

    /// Dispatches the request to the vendor that serves its model and
    /// returns the normalized image list.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Vec<GeneratedImage>> {
        let vendor = request.model.vendor();
        let provider = self
            .slot(vendor)
            .ok_or_else(|| Self::missing_key_error(vendor))?;

        tracing::info!(model = %request.model, vendor = %vendor, n = request.num_images, "dispatching generation request");
        provider.generate(request).await
    }
}
