use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("An error occurred while reading the file: {0}")]
    FileRead(String),

    #[error("Malformed URL: {0}")]
    MalformedUrl(String),

    #[error("Transfer failed: {0}")]
    Transfer(String),

    #[error("I/O error: {0}")]
    Io(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("Download queue has shut down")]
    Shutdown,
}
