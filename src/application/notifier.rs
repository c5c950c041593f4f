use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::{DownloadRequest, QueueEvent};

/// Presentation callbacks invoked by the coordinator.
///
/// Calls arrive on the coordinator task and must return promptly.
pub trait StatusNotifier: Send + Sync {
    /// The request was appended to the queue.
    fn on_pending(&self, _request: &DownloadRequest) {}

    /// The request left the queue and its worker is running.
    fn on_queued(&self, request: &DownloadRequest);

    fn on_completed(&self, request: &DownloadRequest);

    fn on_failed(&self, request: &DownloadRequest, message: &str);
}

/// Forwards every callback as a [`QueueEvent`] over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    events: mpsc::UnboundedSender<QueueEvent>,
}

impl ChannelNotifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<QueueEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (Self { events }, rx)
    }

    fn forward(&self, event: QueueEvent) {
        if self.events.send(event).is_err() {
            debug!("Queue event dropped, no listener");
        }
    }
}

impl StatusNotifier for ChannelNotifier {
    fn on_pending(&self, request: &DownloadRequest) {
        self.forward(QueueEvent::Pending(request.clone()));
    }

    fn on_queued(&self, request: &DownloadRequest) {
        self.forward(QueueEvent::Queued(request.clone()));
    }

    fn on_completed(&self, request: &DownloadRequest) {
        self.forward(QueueEvent::Completed(request.clone()));
    }

    fn on_failed(&self, request: &DownloadRequest, message: &str) {
        self.forward(QueueEvent::Failed(request.clone(), message.to_string()));
    }
}
