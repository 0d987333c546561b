use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures of the download path, local or proxied. The remote transport
/// variants (`Timeout`, `Connect`) are kept distinct so callers can word
/// their messaging differently from a generic extraction failure.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Invalid YouTube URL provided")]
    InvalidUrl,

    #[error("Download timeout - video might be too large")]
    Timeout,

    #[error("Cannot connect to YT-DLP API at {0}")]
    Connect(String),

    #[error("API returned error: {0}")]
    Remote(String),

    #[error("Failed to download video: {0}")]
    Extraction(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<DownloadError> for ApiError {
    fn from(error: DownloadError) -> Self {
        match error {
            DownloadError::InvalidUrl => Self::bad_request(error.to_string()),
            _ => Self::internal(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            success: false,
            error: self.message.clone(),
            // The remote proxy client reads this field back.
            detail: Some(self.message),
        });

        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_maps_to_client_error() {
        let api: ApiError = DownloadError::InvalidUrl.into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_failures_map_to_server_error() {
        for error in [
            DownloadError::Timeout,
            DownloadError::Connect("http://localhost:8001".to_string()),
            DownloadError::Remote("blocked".to_string()),
            DownloadError::Extraction("video unavailable".to_string()),
        ] {
            let api: ApiError = error.into();
            assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn transport_failures_are_worded_distinctly() {
        let timeout = DownloadError::Timeout.to_string();
        let connect = DownloadError::Connect("http://localhost:8001".to_string()).to_string();
        let generic = DownloadError::Extraction("boom".to_string()).to_string();
        assert!(timeout.contains("timeout"));
        assert!(connect.contains("Cannot connect"));
        assert_ne!(timeout, generic);
        assert_ne!(connect, generic);
    }
}
