use std::path::Path;

use async_trait::async_trait;
use futures::{Stream, TryStreamExt};
use reqwest::Client;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;

use super::models::DownloaderConfig;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server responded with status {0}")]
    Status(u16),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// Fetch the bytes behind a URL and persist them to a path.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Copy the whole resource into `dest`, replacing any existing file.
    /// Returns the number of bytes written.
    async fn fetch_to_file(&self, url: &Url, dest: &Path) -> Result<u64>;
}

#[derive(Clone)]
pub struct FetchClient {
    client: Client,
}

impl FetchClient {
    pub fn new(config: &DownloaderConfig) -> Result<Self> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;
        Ok(Self { client })
    }

    /// Open a byte stream for an HTTP(S) URL, along with its content length when known.
    pub async fn download_file_stream(
        &self,
        url: &Url,
    ) -> Result<(Option<u64>, impl Stream<Item = Result<bytes::Bytes>>)> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let total_size = response.content_length();
        let stream = response.bytes_stream().map_err(FetchError::Request);

        Ok((total_size, stream))
    }

    async fn save_http(&self, url: &Url, dest: &Path) -> Result<u64> {
        // Open the stream before touching the destination so a refused
        // request leaves an existing file alone.
        let (total_size, stream) = self.download_file_stream(url).await?;
        let mut stream = std::pin::pin!(stream);

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        while let Some(chunk) = stream.try_next().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.sync_all().await?;

        debug!(url = %url, path = %dest.display(), written, total_size, "HTTP body saved");
        Ok(written)
    }

    async fn copy_local(&self, url: &Url, dest: &Path) -> Result<u64> {
        let source = url
            .to_file_path()
            .map_err(|()| FetchError::UnsupportedScheme(format!("file URL with host: {}", url)))?;

        let written = tokio::fs::copy(&source, dest).await?;

        debug!(source = %source.display(), path = %dest.display(), written, "Local file copied");
        Ok(written)
    }
}

#[async_trait]
impl Fetch for FetchClient {
    async fn fetch_to_file(&self, url: &Url, dest: &Path) -> Result<u64> {
        match url.scheme() {
            "http" | "https" => self.save_http(url, dest).await,
            "file" => self.copy_local(url, dest).await,
            other => Err(FetchError::UnsupportedScheme(other.to_string())),
        }
    }
}
