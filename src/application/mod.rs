pub mod batch_loader;
pub mod download_coordinator;
pub mod download_worker;
pub mod notifier;

pub use batch_loader::{enqueue_batch, load_urls_from_file};
pub use download_coordinator::{QueueCoordinator, QueueHandle};
pub use notifier::ChannelNotifier;

#[cfg(test)]
pub(crate) mod testing {
    use std::{
        path::Path,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
        time::Duration,
    };

    use async_trait::async_trait;
    use tokio::sync::{mpsc, Semaphore};
    use url::Url;

    use super::{ChannelNotifier, QueueCoordinator, QueueHandle};
    use crate::domain::QueueEvent;
    use crate::transfer::client::{self as transfer, FetchError};
    use crate::transfer::{DownloaderConfig, Fetch};

    /// Records every transfer and fails any URL with the `bad` scheme.
    #[derive(Default)]
    pub struct ScriptedFetcher {
        log: Mutex<Vec<String>>,
        active: AtomicUsize,
        max_active: AtomicUsize,
        gate: Option<Arc<Semaphore>>,
    }

    impl ScriptedFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        /// Each transfer waits for one permit before finishing.
        pub fn gated(gate: Arc<Semaphore>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::default()
            }
        }

        pub fn log(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }

        pub fn started(&self) -> Vec<String> {
            self.log()
                .into_iter()
                .filter_map(|entry| entry.strip_prefix("start ").map(str::to_string))
                .collect()
        }

        pub fn max_active(&self) -> usize {
            self.max_active.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetch for ScriptedFetcher {
        async fn fetch_to_file(&self, url: &Url, _dest: &Path) -> transfer::Result<u64> {
            let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(active, Ordering::SeqCst);
            self.log.lock().unwrap().push(format!("start {}", url.as_str()));

            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
            tokio::task::yield_now().await;

            self.log.lock().unwrap().push(format!("finish {}", url.as_str()));
            self.active.fetch_sub(1, Ordering::SeqCst);

            if url.scheme() == "bad" {
                Err(FetchError::UnsupportedScheme("bad".to_string()))
            } else {
                Ok(0)
            }
        }
    }

    pub struct PanickingFetcher;

    #[async_trait]
    impl Fetch for PanickingFetcher {
        async fn fetch_to_file(&self, _url: &Url, _dest: &Path) -> transfer::Result<u64> {
            panic!("transfer blew up");
        }
    }

    pub fn spawn_queue(
        fetcher: Arc<dyn Fetch>,
    ) -> (QueueHandle, mpsc::UnboundedReceiver<QueueEvent>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = DownloaderConfig {
            output_dir: dir.path().join("download_result"),
            ..DownloaderConfig::default()
        };
        let (notifier, events) = ChannelNotifier::channel();
        let queue = QueueCoordinator::spawn(&config, fetcher, Arc::new(notifier));
        (queue, events, dir)
    }

    /// Collect events until `outcomes` requests have completed or failed.
    pub async fn collect_until_settled(
        events: &mut mpsc::UnboundedReceiver<QueueEvent>,
        outcomes: usize,
    ) -> Vec<QueueEvent> {
        let mut seen = Vec::new();
        let mut settled = 0;
        while settled < outcomes {
            let event = tokio::time::timeout(Duration::from_secs(10), events.recv())
                .await
                .expect("timed out waiting for queue events")
                .expect("queue event channel closed");
            if event.is_terminal() {
                settled += 1;
            }
            seen.push(event);
        }
        seen
    }
}
