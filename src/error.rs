//! Error types for image generation and dispatch.

/// Errors that can occur while dispatching a generation request.
#[derive(Debug, thiserror::Error)]
pub enum PixelforgeError {
    /// A required vendor API key is not configured.
    #[error("{0}")]
    Config(String),

    /// The requested model is not part of the supported set.
    #[error("This model is not implemented yet")]
    UnknownModel(String),

    /// The vendor returned a non-success response.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// The vendor response was missing an expected field.
    #[error("unexpected vendor response: {0}")]
    UnexpectedResponse(String),

    /// Failed to decode base64 image data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (e.g., reading or writing the gallery file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PixelforgeError {
    /// HTTP status code this error maps to at the endpoint boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnknownModel(_) => 501,
            _ => 500,
        }
    }

    /// Message safe to hand to callers. Configuration, unknown-model and
    /// upstream errors keep their specific text; everything else collapses
    /// to a generic message so internal detail never leaks.
    pub fn public_message(&self) -> String {
        match self {
            Self::Config(_) | Self::UnknownModel(_) | Self::Upstream { .. } => self.to_string(),
            _ => "Failed to generate images".to_string(),
        }
    }
}

/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, PixelforgeError>;
