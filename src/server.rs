//! HTTP server exposing the generation endpoint.

use crate::error::PixelforgeError;
use crate::image::{GeneratedImage, GenerationRequest, ModelId, ProviderRegistry};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
struct AppState {
    registry: Arc<ProviderRegistry>,
}

/// Wire format of `POST /api/generate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    /// Text prompt.
    pub prompt: String,
    /// Optional negative prompt.
    #[serde(default)]
    pub negative_prompt: Option<String>,
    /// Number of images; defaults to 1, floored at 1.
    #[serde(default)]
    pub num_images: Option<u32>,
    /// Model identifier as a free string; parsed into the closed model set.
    pub model: String,
}

/// Success envelope of `POST /api/generate`.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The normalized image list.
    pub images: Vec<GeneratedImage>,
}

/// Builds the application router over the given registry.
pub fn app(registry: Arc<ProviderRegistry>) -> Router {
    let state = AppState { registry };

    Router::new()
        .route("/api/generate", post(generate_handler))
        .route("/health", get(health_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Binds and serves the API until the process exits.
pub async fn serve(addr: SocketAddr, registry: Arc<ProviderRegistry>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, app(registry)).await
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// POST /api/generate - dispatch one generation request to its vendor.
async fn generate_handler(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Response {
    let model: ModelId = match body.model.parse() {
        Ok(model) => model,
        Err(e) => {
            tracing::warn!(model = %body.model, "unrecognized model requested");
            return error_response(&e);
        }
    };

    let mut request = GenerationRequest::new(body.prompt, model);
    if let Some(negative) = body.negative_prompt {
        request = request.with_negative_prompt(negative);
    }
    if let Some(n) = body.num_images {
        request = request.with_num_images(n);
    }

    match state.registry.generate(&request).await {
        Ok(images) => Json(GenerateResponse { images }).into_response(),
        Err(e) => {
            tracing::error!("generation failed: {e}");
            error_response(&e)
        }
    }
}

fn error_response(error: &PixelforgeError) -> Response {
    let status = StatusCode::from_u16(error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({"error": error.public_message()}))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_body_camel_case() {
        let body: GenerateBody = serde_json::from_str(
            r#"{"prompt": "a fox", "negativePrompt": "blurry", "numImages": 2, "model": "dall-e-3"}"#,
        )
        .unwrap();
        assert_eq!(body.prompt, "a fox");
        assert_eq!(body.negative_prompt.as_deref(), Some("blurry"));
        assert_eq!(body.num_images, Some(2));
        assert_eq!(body.model, "dall-e-3");
    }

    #[test]
    fn test_generate_body_optional_fields() {
        let body: GenerateBody =
            serde_json::from_str(r#"{"prompt": "a fox", "model": "gemini"}"#).unwrap();
        assert!(body.negative_prompt.is_none());
        assert!(body.num_images.is_none());
    }

    #[test]
    fn test_success_envelope_shape() {
        let response = GenerateResponse {
            images: vec![GeneratedImage::from_base64("image/png", "AAA")],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["images"][0]["url"], "data:image/png;base64,AAA");
    }
}
