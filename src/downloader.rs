use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{REMOTE_CLEANUP_TIMEOUT_SECONDS, REMOTE_DOWNLOAD_TIMEOUT_SECONDS};
use crate::error::{DownloadError, ErrorBody};
use crate::extractor::MediaExtractor;
use crate::models::{CleanupResponse, VideoFetchResponse, VideoRecord};
use crate::storage::Storage;
use crate::validate::is_youtube_url;

/// The download backend contract. Two implementations: the local yt-dlp
/// invoker and the remote proxy to a separately deployed instance of the
/// same service. The primary binary picks one at startup.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn fetch(&self, youtube_url: &str) -> Result<VideoRecord, DownloadError>;

    /// Best-effort removal of a previously downloaded file. Never errors.
    async fn cleanup(&self, video_id: &str) -> bool;
}

/// Downloads via yt-dlp into the local temp directory.
///
/// Identifiers are UUIDv4; collisions are not checked, on the assumption that
/// their probability is negligible at any plausible request volume.
pub struct LocalDownloader {
    extractor: Arc<dyn MediaExtractor>,
    storage: Storage,
    description_limit: Option<usize>,
}

impl LocalDownloader {
    pub fn new(
        extractor: Arc<dyn MediaExtractor>,
        storage: Storage,
        description_limit: Option<usize>,
    ) -> Self {
        Self {
            extractor,
            storage,
            description_limit,
        }
    }
}

#[async_trait]
impl Downloader for LocalDownloader {
    async fn fetch(&self, youtube_url: &str) -> Result<VideoRecord, DownloadError> {
        if !is_youtube_url(youtube_url) {
            return Err(DownloadError::InvalidUrl);
        }

        let video_id = Uuid::new_v4().to_string();
        let output_path = self.storage.output_path(&video_id);

        let metadata = match self.extractor.extract(youtube_url, &output_path).await {
            Ok(metadata) => metadata,
            Err(error) => {
                // Never leave partial output behind.
                self.storage.delete(&output_path).await;
                return Err(error);
            }
        };

        info!("Downloaded {youtube_url} to {:?}", output_path);

        let description = metadata.description.unwrap_or_default();
        Ok(VideoRecord {
            video_id,
            file_path: output_path.to_string_lossy().into_owned(),
            title: metadata.title.unwrap_or_else(|| "Unknown".to_string()),
            duration: metadata.duration.map(|d| d as u64).unwrap_or(0),
            uploader: metadata.uploader.unwrap_or_else(|| "Unknown".to_string()),
            thumbnail: metadata.thumbnail.unwrap_or_default(),
            description: truncate_description(&description, self.description_limit),
        })
    }

    async fn cleanup(&self, video_id: &str) -> bool {
        self.storage.delete(&self.storage.output_path(video_id)).await
    }
}

/// Forwards requests to a separately deployed `ytdlp-api` instance and maps
/// its JSON responses back into the local shapes. Descriptions come back as
/// the remote instance chose to truncate them; this side does not re-truncate.
pub struct RemoteDownloader {
    client: reqwest::Client,
    base_url: String,
    download_timeout: Duration,
    cleanup_timeout: Duration,
}

impl RemoteDownloader {
    pub fn new(base_url: impl Into<String>) -> Result<Self, DownloadError> {
        Self::with_timeouts(
            base_url,
            Duration::from_secs(REMOTE_DOWNLOAD_TIMEOUT_SECONDS),
            Duration::from_secs(REMOTE_CLEANUP_TIMEOUT_SECONDS),
        )
    }

    pub fn with_timeouts(
        base_url: impl Into<String>,
        download_timeout: Duration,
        cleanup_timeout: Duration,
    ) -> Result<Self, DownloadError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|error| DownloadError::Extraction(format!("Could not build HTTP client: {error}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            download_timeout,
            cleanup_timeout,
        })
    }

    fn map_transport_error(&self, error: reqwest::Error) -> DownloadError {
        if error.is_timeout() {
            DownloadError::Timeout
        } else if error.is_connect() {
            DownloadError::Connect(self.base_url.clone())
        } else {
            DownloadError::Remote(error.to_string())
        }
    }
}

#[async_trait]
impl Downloader for RemoteDownloader {
    async fn fetch(&self, youtube_url: &str) -> Result<VideoRecord, DownloadError> {
        if !is_youtube_url(youtube_url) {
            return Err(DownloadError::InvalidUrl);
        }

        let response = self
            .client
            .post(format!("{}/download", self.base_url))
            .timeout(self.download_timeout)
            .json(&serde_json::json!({ "youtube_url": youtube_url }))
            .send()
            .await
            .map_err(|error| self.map_transport_error(error))?;

        if !response.status().is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(DownloadError::Remote(detail));
        }

        let body: VideoFetchResponse = response
            .json()
            .await
            .map_err(|error| DownloadError::Remote(format!("Invalid response body: {error}")))?;

        if !body.success {
            return Err(DownloadError::Remote(body.message));
        }

        Ok(VideoRecord {
            video_id: body.video_id.unwrap_or_default(),
            file_path: body.file_path.unwrap_or_default(),
            title: body.title.unwrap_or_else(|| "Unknown".to_string()),
            duration: body.duration.unwrap_or(0),
            uploader: body.uploader.unwrap_or_else(|| "Unknown".to_string()),
            thumbnail: body.thumbnail.unwrap_or_default(),
            description: body.description.unwrap_or_default(),
        })
    }

    async fn cleanup(&self, video_id: &str) -> bool {
        let request = self
            .client
            .delete(format!("{}/cleanup/{video_id}", self.base_url))
            .timeout(self.cleanup_timeout)
            .send()
            .await;

        let response = match request {
            Ok(response) => response,
            Err(error) => {
                warn!("Could not reach remote cleanup endpoint: {error}");
                return false;
            }
        };

        if !response.status().is_success() {
            return false;
        }

        response
            .json::<CleanupResponse>()
            .await
            .map(|body| body.success)
            .unwrap_or(false)
    }
}

/// Truncates on a character boundary at `limit` and appends an ellipsis
/// marker; descriptions at or under the limit pass through untouched.
pub fn truncate_description(description: &str, limit: Option<usize>) -> String {
    match limit {
        Some(limit) if description.chars().count() > limit => {
            let mut truncated: String = description.chars().take(limit).collect();
            truncated.push_str("...");
            truncated
        }
        _ => description.to_string(),
    }
}
