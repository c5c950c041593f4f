use std::{
    panic::AssertUnwindSafe,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::FutureExt;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use url::Url;

use crate::{
    domain::{AppError, DownloadRequest, Outcome},
    transfer::Fetch,
    utils::file_name_from_url,
};

/// Completion message sent back to the coordinator.
#[derive(Debug)]
pub struct TaskFinished {
    pub request: DownloadRequest,
    pub outcome: Outcome,
}

/// Fetches one request into the output directory on its own task.
pub struct DownloadWorker {
    request: DownloadRequest,
    fetcher: Arc<dyn Fetch>,
    output_dir: PathBuf,
}

impl DownloadWorker {
    pub fn new(request: DownloadRequest, fetcher: Arc<dyn Fetch>, output_dir: &Path) -> Self {
        Self {
            request,
            fetcher,
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Run the transfer on a new task. Exactly one [`TaskFinished`] is sent,
    /// even when the transfer panics.
    pub fn spawn(self, finished: mpsc::UnboundedSender<TaskFinished>) {
        tokio::spawn(async move {
            let outcome = match AssertUnwindSafe(self.run()).catch_unwind().await {
                Ok(Ok(path)) => {
                    info!(request_id = %self.request.id, path = %path.display(), "Download saved");
                    Outcome::Success
                }
                Ok(Err(e)) => {
                    warn!(request_id = %self.request.id, url = %self.request.url, error = %e, "Download failed");
                    Outcome::Failure(e.to_string())
                }
                Err(_) => {
                    error!(request_id = %self.request.id, url = %self.request.url, "Download worker panicked");
                    Outcome::Failure("Download worker panicked".to_string())
                }
            };

            let report = TaskFinished {
                request: self.request,
                outcome,
            };
            if finished.send(report).is_err() {
                warn!("Coordinator stopped before the download finished");
            }
        });
    }

    /// Parse, derive the file name, and copy the resource to disk.
    pub async fn run(&self) -> Result<PathBuf, AppError> {
        let url = Url::parse(&self.request.url)
            .map_err(|e| AppError::MalformedUrl(format!("{}: {}", self.request.url, e)))?;

        let path = self.output_dir.join(file_name_from_url(&url));

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| AppError::Io(format!("Failed to create output directory: {}", e)))?;

        self.fetcher
            .fetch_to_file(&url, &path)
            .await
            .map_err(|e| AppError::Transfer(e.to_string()))?;

        Ok(path)
    }
}
