use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::downloader::Downloader;
use crate::error::ApiError;
use crate::models::{CleanupResponse, VideoFetchRequest, VideoFetchResponse};

#[derive(Clone)]
pub struct AppState {
    pub downloader: Arc<dyn Downloader>,
}

/// Router for the primary service: fetch + health under the configured
/// prefix, plus a root welcome route.
pub fn api_router(state: AppState, prefix: &str) -> Router {
    let routed = Router::new()
        .route("/fetch_video", post(fetch_video))
        .route("/health", get(api_health));

    let at_root = prefix.is_empty() || prefix == "/";
    let health_path = if at_root {
        "/health".to_string()
    } else {
        format!("{prefix}/health")
    };

    let router = if at_root {
        routed
    } else {
        Router::new().nest(prefix, routed)
    };

    router
        .route(
            "/",
            get(move || async move {
                Json(serde_json::json!({
                    "message": "Welcome to the video fetch API",
                    "health": health_path,
                }))
            }),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Router for the downstream `ytdlp-api` microservice.
pub fn ytdlp_router(state: AppState) -> Router {
    Router::new()
        .route("/download", post(fetch_video))
        .route("/cleanup/{video_id}", delete(cleanup_video))
        .route("/health", get(ytdlp_health))
        .route("/", get(ytdlp_root))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn fetch_video(
    State(state): State<AppState>,
    Json(payload): Json<VideoFetchRequest>,
) -> Result<Json<VideoFetchResponse>, ApiError> {
    let record = state.downloader.fetch(payload.youtube_url.trim()).await?;
    Ok(Json(VideoFetchResponse::downloaded(record)))
}

async fn cleanup_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Json<CleanupResponse> {
    let deleted = state.downloader.cleanup(&video_id).await;
    let message = if deleted { "Video deleted" } else { "Video not found" };
    Json(CleanupResponse {
        success: deleted,
        message: message.to_string(),
    })
}

async fn api_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "video-ingestion",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn ytdlp_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "ytdlp-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn ytdlp_root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "YT-DLP API",
        "status": "running",
        "endpoints": {
            "download": "POST /download",
            "cleanup": "DELETE /cleanup/{video_id}",
            "health": "GET /health",
        },
    }))
}
