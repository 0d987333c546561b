use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{info, warn};

/// Flat directory of `<video_id>.mp4` files. Identifiers are random per
/// request, so concurrent requests never contend over the same path.
#[derive(Debug, Clone)]
pub struct Storage {
    temp_dir: PathBuf,
}

impl Storage {
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
        }
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub async fn ensure_temp_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.temp_dir).await
    }

    pub fn output_path(&self, video_id: &str) -> PathBuf {
        self.temp_dir.join(format!("{video_id}.mp4"))
    }

    /// Best-effort removal. Only regular files are deleted; any filesystem
    /// error is logged and reported as `false`, never propagated.
    pub async fn delete(&self, path: &Path) -> bool {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(error) => {
                if error.kind() != ErrorKind::NotFound {
                    warn!("Could not stat {:?}: {error}", path);
                }
                return false;
            }
        };

        if !metadata.is_file() {
            return false;
        }

        match tokio::fs::remove_file(path).await {
            Ok(()) => true,
            Err(error) => {
                warn!("Could not delete {:?}: {error}", path);
                false
            }
        }
    }

    /// Deletes every `.mp4` in the temp directory whose modification time is
    /// older than `max_age`. Per-file errors are logged and skipped. Returns
    /// the number of files deleted.
    pub async fn sweep(&self, max_age: Duration) -> usize {
        let mut entries = match tokio::fs::read_dir(&self.temp_dir).await {
            Ok(entries) => entries,
            Err(error) => {
                if error.kind() != ErrorKind::NotFound {
                    warn!("Could not open temp directory for sweep: {error}");
                }
                return 0;
            }
        };

        let now = SystemTime::now();
        let mut deleted = 0;

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(error) => {
                    warn!("Could not iterate temp directory during sweep: {error}");
                    break;
                }
            };

            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("mp4") {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                Err(error) => {
                    warn!("Could not stat {:?} during sweep: {error}", path);
                    continue;
                }
            };

            if !metadata.is_file() {
                continue;
            }

            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or(Duration::ZERO);

            if age < max_age {
                continue;
            }

            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    info!("Deleted old video: {:?}", path.file_name());
                    deleted += 1;
                }
                Err(error) => {
                    warn!("Could not delete {:?} during sweep: {error}", path);
                }
            }
        }

        deleted
    }
}
