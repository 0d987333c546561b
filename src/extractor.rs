use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::{
    DEFAULT_YTDLP_TIMEOUT_SECONDS, EXTRACTOR_RETRIES, SOCKET_TIMEOUT_SECONDS,
};
use crate::error::DownloadError;

/// Metadata as reported by the extractor, before defaulting. Anything absent
/// upstream stays `None` here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMetadata {
    pub title: Option<String>,
    pub duration: Option<f64>,
    pub uploader: Option<String>,
    pub thumbnail: Option<String>,
    pub description: Option<String>,
}

/// Seam between the download invoker and the actual extraction tool, so the
/// HTTP layer can be exercised against a stub.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Downloads `url` to `output_path` and returns the extracted metadata.
    /// Must not leave a file behind on failure beyond whatever partial output
    /// the tool wrote; the invoker cleans the computed path afterwards.
    async fn extract(&self, url: &str, output_path: &Path) -> Result<RawMetadata, DownloadError>;
}

/// Scoped configuration for a yt-dlp invocation. Nothing here touches
/// process-wide state; the certificate-check bypass is a per-call flag.
#[derive(Debug, Clone)]
pub struct ExtractorOptions {
    /// yt-dlp format selector: best MP4, falling back to best of anything.
    pub format: String,
    pub no_check_certificate: bool,
    pub socket_timeout: Duration,
    pub retries: u32,
    /// Client-impersonation hint to work around extractor blocking.
    pub player_client: String,
    /// Overall ceiling on the subprocess, enforced with `tokio::time::timeout`.
    /// The child is killed when the ceiling expires.
    pub process_timeout: Duration,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            format: "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best".to_string(),
            no_check_certificate: true,
            socket_timeout: Duration::from_secs(SOCKET_TIMEOUT_SECONDS),
            retries: EXTRACTOR_RETRIES,
            player_client: "android".to_string(),
            process_timeout: Duration::from_secs(DEFAULT_YTDLP_TIMEOUT_SECONDS),
        }
    }
}

/// Runs the `yt-dlp` binary. A single invocation both downloads the file and
/// dumps the info JSON (`--no-simulate --dump-single-json`).
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    options: ExtractorOptions,
}

impl YtDlpExtractor {
    pub fn new(options: ExtractorOptions) -> Self {
        Self { options }
    }

    fn build_args(&self, url: &str, output_path: &Path) -> Vec<String> {
        let mut args = vec![
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--no-simulate".to_string(),
            "--dump-single-json".to_string(),
            "-f".to_string(),
            self.options.format.clone(),
            "-o".to_string(),
            output_path.to_string_lossy().into_owned(),
            "--socket-timeout".to_string(),
            self.options.socket_timeout.as_secs().to_string(),
            "--retries".to_string(),
            self.options.retries.to_string(),
            "--extractor-args".to_string(),
            format!("youtube:player_client={}", self.options.player_client),
        ];

        if self.options.no_check_certificate {
            args.push("--no-check-certificates".to_string());
        }

        args.push(url.to_string());
        args
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn extract(&self, url: &str, output_path: &Path) -> Result<RawMetadata, DownloadError> {
        let args = self.build_args(url, output_path);
        let mut command = Command::new("yt-dlp");
        command.args(args).kill_on_drop(true);

        let output = timeout(self.options.process_timeout, command.output())
            .await
            .map_err(|_| {
                DownloadError::Extraction(format!(
                    "yt-dlp timed out after {}s",
                    self.options.process_timeout.as_secs()
                ))
            })?
            .map_err(|error| {
                if error.kind() == ErrorKind::NotFound {
                    DownloadError::Extraction(
                        "yt-dlp is not installed on this system".to_string(),
                    )
                } else {
                    DownloadError::Extraction(format!("Could not run yt-dlp: {error}"))
                }
            })?;

        if !output.status.success() {
            return Err(DownloadError::Extraction(stderr_message(&output.stderr)));
        }

        serde_json::from_slice(&output.stdout).map_err(|error| {
            DownloadError::Extraction(format!("Could not parse yt-dlp output: {error}"))
        })
    }
}

fn stderr_message(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .next_back()
        .unwrap_or("yt-dlp could not complete the download")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn args_carry_the_fixed_option_set() {
        let extractor = YtDlpExtractor::new(ExtractorOptions::default());
        let args = extractor.build_args(
            "https://youtu.be/abc123",
            &PathBuf::from("/tmp/videos/id.mp4"),
        );

        let joined = args.join(" ");
        assert!(joined.contains("--no-simulate --dump-single-json"));
        assert!(joined.contains("-f bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best"));
        assert!(joined.contains("-o /tmp/videos/id.mp4"));
        assert!(joined.contains("--socket-timeout 30"));
        assert!(joined.contains("--retries 3"));
        assert!(joined.contains("--extractor-args youtube:player_client=android"));
        assert!(joined.contains("--no-check-certificates"));
        assert_eq!(args.last().map(String::as_str), Some("https://youtu.be/abc123"));
    }

    #[test]
    fn certificate_bypass_is_optional() {
        let extractor = YtDlpExtractor::new(ExtractorOptions {
            no_check_certificate: false,
            ..ExtractorOptions::default()
        });
        let args = extractor.build_args("https://youtu.be/abc123", &PathBuf::from("out.mp4"));
        assert!(!args.iter().any(|arg| arg == "--no-check-certificates"));
    }

    #[test]
    fn stderr_message_takes_the_last_meaningful_line() {
        let stderr = b"WARNING: something\nERROR: Video unavailable\n\n";
        assert_eq!(stderr_message(stderr), "ERROR: Video unavailable");
        assert_eq!(
            stderr_message(b""),
            "yt-dlp could not complete the download"
        );
    }

    #[test]
    fn metadata_parses_from_info_json() {
        let json = br#"{"title":"T","duration":42.0,"uploader":"U","thumbnail":"http://t","description":"d","extra":1}"#;
        let meta: RawMetadata = serde_json::from_slice(json).unwrap();
        assert_eq!(meta.title.as_deref(), Some("T"));
        assert_eq!(meta.duration, Some(42.0));
        assert_eq!(meta.uploader.as_deref(), Some("U"));
    }
}
