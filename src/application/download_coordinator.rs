use std::{collections::VecDeque, path::PathBuf, sync::Arc};

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::{
    download_worker::{DownloadWorker, TaskFinished},
    notifier::StatusNotifier,
};
use crate::{
    domain::{DownloadRequest, Outcome, QueueError, RequestId},
    transfer::{DownloaderConfig, Fetch},
};

#[derive(Debug)]
enum QueueCommand {
    Enqueue(String),
}

/// Cloneable entry point to a running [`QueueCoordinator`].
#[derive(Debug, Clone)]
pub struct QueueHandle {
    command_tx: mpsc::UnboundedSender<QueueCommand>,
}

impl QueueHandle {
    /// Append a URL to the download queue. Never blocks.
    pub fn enqueue(&self, url: impl Into<String>) -> Result<(), QueueError> {
        self.command_tx
            .send(QueueCommand::Enqueue(url.into()))
            .map_err(|_| QueueError::Shutdown)
    }
}

/// Owns the pending queue and the busy flag. Runs as a single task, so
/// every read-modify-write of that state is serialized by its message loop.
pub struct QueueCoordinator {
    pending: VecDeque<DownloadRequest>,
    busy: bool,
    next_id: u64,
    output_dir: PathBuf,
    fetcher: Arc<dyn Fetch>,
    notifier: Arc<dyn StatusNotifier>,
    finished_tx: mpsc::UnboundedSender<TaskFinished>,
}

impl QueueCoordinator {
    /// Start a coordinator on the current tokio runtime.
    ///
    /// The coordinator stops once every handle is dropped and the queue
    /// has drained.
    pub fn spawn(
        config: &DownloaderConfig,
        fetcher: Arc<dyn Fetch>,
        notifier: Arc<dyn StatusNotifier>,
    ) -> QueueHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (finished_tx, finished_rx) = mpsc::unbounded_channel();

        let coordinator = Self {
            pending: VecDeque::new(),
            busy: false,
            next_id: 0,
            output_dir: config.output_dir.clone(),
            fetcher,
            notifier,
            finished_tx,
        };
        tokio::spawn(coordinator.run(command_rx, finished_rx));

        QueueHandle { command_tx }
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<QueueCommand>,
        mut finished: mpsc::UnboundedReceiver<TaskFinished>,
    ) {
        let mut accepting = true;

        loop {
            tokio::select! {
                biased;

                Some(report) = finished.recv() => {
                    self.on_task_finished(report.request, report.outcome);
                }
                command = commands.recv(), if accepting => match command {
                    Some(QueueCommand::Enqueue(url)) => self.enqueue(url),
                    None => {
                        debug!(pending = self.pending.len(), "All queue handles dropped, draining");
                        accepting = false;
                    }
                },
                else => break,
            }

            if !accepting && !self.busy && self.pending.is_empty() {
                break;
            }
        }

        debug!("Download queue stopped");
    }

    fn enqueue(&mut self, url: String) {
        self.next_id += 1;
        let request = DownloadRequest {
            id: RequestId(self.next_id),
            url,
        };

        info!(request_id = %request.id, url = %request.url, "Request enqueued");
        self.notifier.on_pending(&request);
        self.pending.push_back(request);

        if !self.busy {
            self.dispatch_next();
        }
    }

    fn dispatch_next(&mut self) {
        debug_assert!(!self.busy, "dispatch while a worker is active");

        let Some(request) = self.pending.pop_front() else {
            return;
        };

        self.busy = true;
        debug!(request_id = %request.id, remaining = self.pending.len(), "Starting download");

        DownloadWorker::new(request.clone(), Arc::clone(&self.fetcher), &self.output_dir)
            .spawn(self.finished_tx.clone());
        self.notifier.on_queued(&request);
    }

    fn on_task_finished(&mut self, request: DownloadRequest, outcome: Outcome) {
        self.busy = false;
        if !self.pending.is_empty() {
            self.dispatch_next();
        }

        match outcome {
            Outcome::Success => {
                info!(request_id = %request.id, url = %request.url, "Download complete");
                self.notifier.on_completed(&request);
            }
            Outcome::Failure(message) => {
                info!(request_id = %request.id, url = %request.url, error = %message, "Download failed");
                self.notifier.on_failed(&request, &message);
            }
        }
    }
}
