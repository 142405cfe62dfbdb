//! Image generation module.

mod provider;
pub mod providers;
mod registry;
mod types;

pub use provider::ImageProvider;
pub use registry::ProviderRegistry;
pub use types::{GeneratedImage, GenerationRequest, ModelId, VendorKind};
