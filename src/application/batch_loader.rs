use std::path::Path;

use tracing::{info, warn};

use super::download_coordinator::QueueHandle;
use crate::domain::{AppError, QueueError};

/// Read a batch file: one URL per line, blank lines skipped, file order kept.
///
/// Nothing is returned if any part of the file is unreadable.
pub async fn load_urls_from_file(path: impl AsRef<Path>) -> Result<Vec<String>, AppError> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        warn!(path = %path.display(), error = %e, "Failed to read batch file");
        AppError::FileRead(e.to_string())
    })?;

    let urls = parse_batch(&contents);
    info!(path = %path.display(), count = urls.len(), "Batch file loaded");
    Ok(urls)
}

pub fn parse_batch(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Enqueue every URL in order. Returns how many were accepted.
pub fn enqueue_batch(queue: &QueueHandle, urls: Vec<String>) -> Result<usize, QueueError> {
    let count = urls.len();
    for url in urls {
        queue.enqueue(url)?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::testing::{collect_until_settled, spawn_queue, ScriptedFetcher};
    use crate::domain::QueueEvent;

    #[test]
    fn test_parse_batch_skips_blank_lines() {
        let urls = parse_batch("https://a.example/1\n\n  \r\nhttps://b.example/2\r\nhttps://c.example/3");
        assert_eq!(
            urls,
            vec![
                "https://a.example/1",
                "https://b.example/2",
                "https://c.example/3"
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = load_urls_from_file(dir.path().join("nope.txt"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::FileRead(_)));
    }

    #[tokio::test]
    async fn test_batch_file_enqueues_non_empty_lines_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let batch = dir.path().join("urls.txt");
        std::fs::write(
            &batch,
            "https://example.com/one.txt\nhttps://example.com/two.txt\n\nhttps://example.com/three.txt\n",
        )
        .unwrap();

        let fetcher = Arc::new(ScriptedFetcher::new());
        let (queue, mut events, _out) = spawn_queue(fetcher.clone());

        let urls = load_urls_from_file(&batch).await.unwrap();
        assert_eq!(enqueue_batch(&queue, urls), Ok(3));

        let events = collect_until_settled(&mut events, 3).await;
        let pending: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                QueueEvent::Pending(request) => Some(request.url.as_str()),
                _ => None,
            })
            .collect();

        assert_eq!(
            pending,
            vec![
                "https://example.com/one.txt",
                "https://example.com/two.txt",
                "https://example.com/three.txt"
            ]
        );
        assert_eq!(fetcher.started().len(), 3);
    }
}
