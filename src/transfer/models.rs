use std::path::PathBuf;

/// Downloads land here unless configured otherwise.
pub const DEFAULT_OUTPUT_DIR: &str = "download_result";

/// Configuration for the download queue and its transfer client
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    pub output_dir: PathBuf,
    pub user_agent: String,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            user_agent: format!("queued-downloader/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
