#![warn(missing_docs)]
//! Pixelforge - multi-vendor text-to-image generation.
//!
//! One normalized request shape, dispatched to exactly one upstream vendor
//! (OpenAI DALL-E, Stability AI, Google Gemini), returning a normalized list
//! of image references: remote URLs or `data:` URIs.
//!
//! # Quick Start
//!
//! ```no_run
//! use pixelforge::{GenerationRequest, ModelId, ProviderRegistry};
//! use pixelforge::config::Config;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> pixelforge::Result<()> {
//!     let registry = ProviderRegistry::from_config(&Config::from_env());
//!     let request = GenerationRequest::new("A golden retriever puppy", ModelId::DallE3)
//!         .with_num_images(2);
//!     let images = registry.generate(&request).await?;
//!     for image in images {
//!         println!("{}", image.url);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Serving
//!
//! The same dispatch is exposed over HTTP as `POST /api/generate`; see
//! [`server::serve`].

pub mod config;
mod error;
pub mod gallery;
pub mod image;
pub mod server;

pub use error::{PixelforgeError, Result};
pub use image::{
    GeneratedImage, GenerationRequest, ImageProvider, ModelId, ProviderRegistry, VendorKind,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{PixelforgeError, Result};
    pub use crate::gallery::{GalleryStore, StoredImage};
    pub use crate::image::{
        GeneratedImage, GenerationRequest, ImageProvider, ModelId, ProviderRegistry, VendorKind,
    };
}
