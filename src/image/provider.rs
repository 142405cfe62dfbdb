//! Image provider trait.

use crate::error::Result;
use crate::image::types::{GeneratedImage, GenerationRequest, VendorKind};
use async_trait::async_trait;

/// Trait for image generation vendors.
///
/// Each upstream API gets one implementation; adding a vendor means adding
/// one implementation and one registry slot, not editing a conditional chain.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generates images for the given request against the upstream API.
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<GeneratedImage>>;

    /// Returns the kind of this vendor.
    fn kind(&self) -> VendorKind;
}
