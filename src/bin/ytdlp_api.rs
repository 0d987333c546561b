use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;

use vidfetch::config::{SWEEP_MAX_AGE_HOURS, Settings};
use vidfetch::downloader::LocalDownloader;
use vidfetch::error::ApiError;
use vidfetch::extractor::{ExtractorOptions, YtDlpExtractor};
use vidfetch::routes::{AppState, ytdlp_router};
use vidfetch::storage::Storage;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "vidfetch=info,tower_http=info".to_string()),
        )
        .init();

    if let Err(error) = run().await {
        eprintln!("Server error: {}", error.message);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ApiError> {
    let settings = Settings::from_env(8001)?;

    let storage = Storage::new(&settings.temp_dir);
    storage.ensure_temp_dir().await.map_err(|error| {
        ApiError::internal(format!("Could not create temp directory: {error}"))
    })?;

    // Expire leftovers from previous runs. No endpoint triggers this; an
    // external scheduler has to handle expiry while the process is up.
    let swept = storage
        .sweep(Duration::from_secs(SWEEP_MAX_AGE_HOURS * 3600))
        .await;
    if swept > 0 {
        info!("Swept {swept} old video file(s) from {:?}", settings.temp_dir);
    }

    let extractor = YtDlpExtractor::new(ExtractorOptions {
        process_timeout: settings.ytdlp_timeout,
        ..ExtractorOptions::default()
    });
    let downloader = Arc::new(LocalDownloader::new(
        Arc::new(extractor),
        storage,
        settings.description_limit,
    ));

    let app = ytdlp_router(AppState { downloader });

    let addr = settings.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|error| ApiError::internal(format!("Could not bind {addr}: {error}")))?;

    info!("YT-DLP API listening on http://{addr}");

    axum::serve(listener, app)
        .await
        .map_err(|error| ApiError::internal(format!("HTTP server error: {error}")))
}
