// Shared across the integration-test binaries; not every binary uses every helper.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;

use vidfetch::downloader::LocalDownloader;
use vidfetch::error::DownloadError;
use vidfetch::extractor::{MediaExtractor, RawMetadata};
use vidfetch::routes::{AppState, api_router, ytdlp_router};
use vidfetch::storage::Storage;

/// Extractor stand-in: either "downloads" by writing a small file and
/// returning canned metadata, or writes partial output and fails the way
/// yt-dlp does when a download breaks midway.
pub enum StubBehavior {
    Success(RawMetadata),
    FailAfterPartialWrite(String),
}

pub struct StubExtractor {
    behavior: StubBehavior,
}

impl StubExtractor {
    pub fn new(behavior: StubBehavior) -> Self {
        Self { behavior }
    }
}

#[async_trait]
impl MediaExtractor for StubExtractor {
    async fn extract(&self, _url: &str, output_path: &Path) -> Result<RawMetadata, DownloadError> {
        match &self.behavior {
            StubBehavior::Success(metadata) => {
                tokio::fs::write(output_path, b"video-bytes").await.unwrap();
                Ok(metadata.clone())
            }
            StubBehavior::FailAfterPartialWrite(message) => {
                tokio::fs::write(output_path, b"partial").await.unwrap();
                Err(DownloadError::Extraction(message.clone()))
            }
        }
    }
}

pub fn sample_metadata() -> RawMetadata {
    RawMetadata {
        title: Some("T".to_string()),
        duration: Some(42.0),
        uploader: Some("U".to_string()),
        thumbnail: Some("https://i.ytimg.com/vi/abc123/default.jpg".to_string()),
        description: Some("a test video".to_string()),
    }
}

pub fn local_downloader(
    temp_dir: &Path,
    behavior: StubBehavior,
    description_limit: Option<usize>,
) -> Arc<LocalDownloader> {
    Arc::new(LocalDownloader::new(
        Arc::new(StubExtractor::new(behavior)),
        Storage::new(temp_dir),
        description_limit,
    ))
}

pub fn api_test_server(temp_dir: &Path, behavior: StubBehavior) -> TestServer {
    let state = AppState {
        downloader: local_downloader(temp_dir, behavior, Some(200)),
    };
    TestServer::new(api_router(state, "/api/v1")).unwrap()
}

pub fn ytdlp_test_server(temp_dir: &Path, behavior: StubBehavior) -> TestServer {
    TestServer::new(ytdlp_app(temp_dir, behavior, Some(200))).unwrap()
}

pub fn ytdlp_app(
    temp_dir: &Path,
    behavior: StubBehavior,
    description_limit: Option<usize>,
) -> Router {
    let state = AppState {
        downloader: local_downloader(temp_dir, behavior, description_limit),
    };
    ytdlp_router(state)
}

/// All `.mp4` files currently in the temp directory.
pub fn stored_mp4_files(temp_dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(temp_dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("mp4"))
        .collect()
}
