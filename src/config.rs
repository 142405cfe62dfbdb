//! Environment-backed configuration.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_GALLERY_PATH: &str = "gallery.json";

/// Process configuration, read once at startup.
///
/// Vendor keys are all optional: a missing key only disables that vendor's
/// dispatch path.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key (`OPENAI_API_KEY`).
    pub openai_api_key: Option<String>,
    /// Stability AI API key (`STABILITY_API_KEY`).
    pub stability_api_key: Option<String>,
    /// Google API key (`GOOGLE_API_KEY`).
    pub google_api_key: Option<String>,
    /// Address the HTTP server binds to (`PIXELFORGE_ADDR`).
    pub addr: SocketAddr,
    /// Path of the local gallery file (`PIXELFORGE_GALLERY`).
    pub gallery_path: PathBuf,
}

impl Config {
    /// Reads configuration from the environment.
    pub fn from_env() -> Self {
        let addr = env::var("PIXELFORGE_ADDR")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| DEFAULT_ADDR.parse().expect("default addr parses"));

        Self {
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            stability_api_key: env::var("STABILITY_API_KEY").ok(),
            google_api_key: env::var("GOOGLE_API_KEY").ok(),
            addr,
            gallery_path: env::var("PIXELFORGE_GALLERY")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_GALLERY_PATH)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            stability_api_key: None,
            google_api_key: None,
            addr: DEFAULT_ADDR.parse().expect("default addr parses"),
            gallery_path: PathBuf::from(DEFAULT_GALLERY_PATH),
        }
    }
}
