//! Vendor-specific image generation providers.

mod gemini;
mod openai;
mod stability;

pub use gemini::{GeminiProvider, GeminiProviderBuilder};
pub use openai::{OpenAiProvider, OpenAiProviderBuilder};
pub use stability::{StabilityProvider, StabilityProviderBuilder};
