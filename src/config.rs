use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::ApiError;

pub const DEFAULT_DESCRIPTION_LIMIT: usize = 200;
pub const DEFAULT_YTDLP_TIMEOUT_SECONDS: u64 = 180;
pub const SOCKET_TIMEOUT_SECONDS: u64 = 30;
pub const EXTRACTOR_RETRIES: u32 = 3;
pub const REMOTE_DOWNLOAD_TIMEOUT_SECONDS: u64 = 120;
pub const REMOTE_CLEANUP_TIMEOUT_SECONDS: u64 = 10;
pub const SWEEP_MAX_AGE_HOURS: u64 = 24;

/// Which backend the primary service uses to fulfil download requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadBackend {
    Local,
    Remote,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub temp_dir: PathBuf,
    pub api_prefix: String,
    pub ytdlp_api_url: String,
    pub backend: DownloadBackend,
    /// Character limit applied to descriptions by the local download path.
    /// `None` disables truncation.
    pub description_limit: Option<usize>,
    /// Overall ceiling on a single yt-dlp invocation, enforced by the service
    /// on top of yt-dlp's own socket timeout.
    pub ytdlp_timeout: Duration,
}

impl Settings {
    pub fn from_env(default_port: u16) -> Result<Self, ApiError> {
        let host = read_env("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = read_env("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(default_port);

        let temp_dir = read_env("TEMP_VIDEO_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./temp_videos"));

        let api_prefix = read_env("API_PREFIX").unwrap_or_else(|| "/api/v1".to_string());

        let ytdlp_api_url =
            read_env("YTDLP_API_URL").unwrap_or_else(|| "http://localhost:8001".to_string());
        Url::parse(&ytdlp_api_url).map_err(|error| {
            ApiError::internal(format!("YTDLP_API_URL is not a valid URL: {error}"))
        })?;
        let ytdlp_api_url = ytdlp_api_url.trim_end_matches('/').to_string();

        let backend = match read_env("DOWNLOAD_BACKEND").as_deref() {
            None | Some("local") => DownloadBackend::Local,
            Some("remote") => DownloadBackend::Remote,
            Some(other) => {
                return Err(ApiError::internal(format!(
                    "DOWNLOAD_BACKEND must be \"local\" or \"remote\", got {other:?}"
                )));
            }
        };

        let description_limit = match read_env("DESCRIPTION_LIMIT") {
            Some(value) => {
                let limit = value.parse::<usize>().map_err(|error| {
                    ApiError::internal(format!("DESCRIPTION_LIMIT must be a number: {error}"))
                })?;
                (limit > 0).then_some(limit)
            }
            None => Some(DEFAULT_DESCRIPTION_LIMIT),
        };

        let ytdlp_timeout = read_env("YTDLP_TIMEOUT_SECONDS")
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_YTDLP_TIMEOUT_SECONDS));

        Ok(Self {
            host,
            port,
            temp_dir,
            api_prefix,
            ytdlp_api_url,
            backend,
            description_limit,
            ytdlp_timeout,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ApiError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|error| {
                ApiError::internal(format!(
                    "Invalid bind address {}:{}: {error}",
                    self.host, self.port
                ))
            })
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
