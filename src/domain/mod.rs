pub mod error;
pub mod model;

pub use error::{AppError, QueueError};
pub use model::{DownloadRequest, Outcome, QueueEvent, RequestId, RequestStatus};
