mod app;
mod application;
mod domain;
mod transfer;
mod ui;
mod utils;

use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    iced::application(app::DownloadApp::default, app::update, app::view)
        .title("Download Manager")
        .subscription(app::subscription)
        .window_size((640.0, 480.0))
        .run()
}
