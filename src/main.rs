use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use vidfetch::config::{DownloadBackend, Settings};
use vidfetch::downloader::{Downloader, LocalDownloader, RemoteDownloader};
use vidfetch::error::ApiError;
use vidfetch::extractor::{ExtractorOptions, YtDlpExtractor};
use vidfetch::routes::{AppState, api_router};
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
    let settings = Settings::from_env(8000)?;

    let storage = Storage::new(&settings.temp_dir);
    storage.ensure_temp_dir().await.map_err(|error| {
        ApiError::internal(format!("Could not create temp directory: {error}"))
    })?;

    let downloader: Arc<dyn Downloader> = match settings.backend {
        DownloadBackend::Local => {
            info!("Using local yt-dlp download backend");
            let extractor = YtDlpExtractor::new(ExtractorOptions {
                process_timeout: settings.ytdlp_timeout,
                ..ExtractorOptions::default()
            });
            Arc::new(LocalDownloader::new(
                Arc::new(extractor),
                storage,
                settings.description_limit,
            ))
        }
        DownloadBackend::Remote => {
            info!("Proxying downloads to {}", settings.ytdlp_api_url);
            Arc::new(
                RemoteDownloader::new(settings.ytdlp_api_url.clone())
                    .map_err(|error| ApiError::internal(error.to_string()))?,
            )
        }
    };

    let app = api_router(AppState { downloader }, &settings.api_prefix);

    let addr = settings.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|error| ApiError::internal(format!("Could not bind {addr}: {error}")))?;

    info!("Video fetch API listening on http://{addr}");

    axum::serve(listener, app)
        .await
        .map_err(|error| ApiError::internal(format!("HTTP server error: {error}")))
}
