use serde::{Deserialize, Serialize};

/// Body of `POST fetch_video` / `POST /download`.
#[derive(Debug, Deserialize)]
pub struct VideoFetchRequest {
    pub youtube_url: String,
}

/// A downloaded video: the stored file plus the metadata extracted alongside
/// it. Transient, lives only in the HTTP response; the file on disk is the
/// only durable artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    pub file_path: String,
    pub title: String,
    pub duration: u64,
    pub uploader: String,
    pub thumbnail: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VideoFetchResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploader: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl VideoFetchResponse {
    pub fn downloaded(record: VideoRecord) -> Self {
        Self {
            success: true,
            message: "Video downloaded successfully".to_string(),
            video_id: Some(record.video_id),
            file_path: Some(record.file_path),
            title: Some(record.title),
            duration: Some(record.duration),
            uploader: Some(record.uploader),
            thumbnail: Some(record.thumbnail),
            description: Some(record.description),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub success: bool,
    pub message: String,
}
