use std::fmt;

/// Sequence number assigned by the coordinator in enqueue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One URL submitted for download. Two requests for the same URL are independent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub id: RequestId,
    pub url: String,
}

/// Terminal result of processing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(String),
}

/// Status updates emitted by the queue, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
    Pending(DownloadRequest),
    Queued(DownloadRequest),
    Completed(DownloadRequest),
    Failed(DownloadRequest, String),
}

impl QueueEvent {
    pub fn request(&self) -> &DownloadRequest {
        match self {
            QueueEvent::Pending(request)
            | QueueEvent::Queued(request)
            | QueueEvent::Completed(request)
            | QueueEvent::Failed(request, _) => request,
        }
    }

    #[cfg(test)]
    pub fn is_terminal(&self) -> bool {
        matches!(self, QueueEvent::Completed(_) | QueueEvent::Failed(..))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    InProgress,
    Succeeded,
    Failed,
}
