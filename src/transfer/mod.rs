pub mod client;
pub mod models;

pub use client::{Fetch, FetchClient};
pub use models::DownloaderConfig;
