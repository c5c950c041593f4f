use std::{path::PathBuf, sync::Arc};

use iced::futures::{channel::mpsc, SinkExt, Stream};
use iced::{Subscription, Task};
use rfd::{AsyncFileDialog, AsyncMessageDialog, MessageButtons, MessageLevel};
use tracing::{error, warn};

use crate::application::{
    enqueue_batch, load_urls_from_file, ChannelNotifier, QueueCoordinator, QueueHandle,
};
use crate::domain::{AppError, QueueEvent};
use crate::transfer::{DownloaderConfig, FetchClient};
use crate::ui::{DownloadMessage, DownloadView};

const DOWNLOAD_ERROR_MESSAGE: &str = "An error occurred during download.";
const FILE_READ_ERROR_MESSAGE: &str = "An error occurred while reading the file.";

#[derive(Default)]
pub struct DownloadApp {
    view: DownloadView,
    // Set once the queue subscription has started the coordinator
    queue: Option<QueueHandle>,
    // URLs submitted before the queue started, in submission order
    waiting: Vec<String>,
}

impl DownloadApp {
    fn submit(&mut self, urls: Vec<String>) {
        let Some(queue) = &self.queue else {
            self.waiting.extend(urls);
            self.view.status_message = format!(
                "{} URLs waiting for the download queue to start",
                self.waiting.len()
            );
            return;
        };

        match enqueue_batch(queue, urls) {
            Ok(count) if count > 1 => {
                self.view.status_message = format!("Queued {} URLs", count);
            }
            Ok(_) => {}
            Err(e) => {
                error!(error = %e, "Enqueue rejected");
                self.view.status_message = e.to_string();
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    QueueReady(QueueHandle),
    QueueUnavailable(String),
    Queue(QueueEvent),
    BatchFileSelected(Option<PathBuf>),
    BatchLoaded(Result<Vec<String>, AppError>),
    DialogClosed,
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::DownloadPressed => {
                    let url = std::mem::take(&mut app.view.url_input);
                    let url = url.trim();
                    if !url.is_empty() {
                        app.submit(vec![url.to_string()]);
                    }
                }
                DownloadMessage::BrowsePressed => {
                    return Task::perform(
                        async {
                            AsyncFileDialog::new()
                                .pick_file()
                                .await
                                .map(|handle| handle.path().to_path_buf())
                        },
                        Message::BatchFileSelected,
                    );
                }
                DownloadMessage::UrlChanged(_) => {}
            }
        }
        Message::QueueReady(queue) => {
            app.queue = Some(queue);
            let waiting = std::mem::take(&mut app.waiting);
            if !waiting.is_empty() {
                app.submit(waiting);
            }
        }
        Message::QueueUnavailable(reason) => {
            app.view.status_message = format!("Download queue unavailable: {}", reason);
        }
        Message::Queue(event) => {
            app.view.apply(&event);

            match event {
                QueueEvent::Queued(request) => {
                    app.view.status_message = format!("Downloading: {}", request.url);
                }
                QueueEvent::Completed(request) => {
                    app.view.status_message = format!("Saved: {}", request.url);
                    return show_dialog(
                        MessageLevel::Info,
                        "Download Complete",
                        format!("Download complete: {}", request.url),
                    );
                }
                QueueEvent::Failed(request, _) => {
                    app.view.status_message = format!("Download failed: {}", request.url);
                    return show_dialog(
                        MessageLevel::Error,
                        "Error",
                        DOWNLOAD_ERROR_MESSAGE.to_string(),
                    );
                }
                QueueEvent::Pending(_) => {}
            }
        }
        Message::BatchFileSelected(Some(path)) => {
            return Task::perform(load_urls_from_file(path), Message::BatchLoaded);
        }
        Message::BatchFileSelected(None) => {
            // User cancelled dialog
        }
        Message::BatchLoaded(Ok(urls)) => {
            app.submit(urls);
        }
        Message::BatchLoaded(Err(e)) => {
            warn!(error = %e, "Batch file rejected");
            return show_dialog(
                MessageLevel::Error,
                "Error",
                FILE_READ_ERROR_MESSAGE.to_string(),
            );
        }
        Message::DialogClosed => {}
    }
    Task::none()
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}

pub fn subscription(_app: &DownloadApp) -> Subscription<Message> {
    Subscription::run(download_queue)
}

/// Starts the coordinator on iced's runtime and relays its events.
fn download_queue() -> impl Stream<Item = Message> {
    iced::stream::channel(100, |mut output: mpsc::Sender<Message>| async move {
        let config = DownloaderConfig::default();

        let fetcher = match FetchClient::new(&config) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                error!(error = %e, "Failed to build transfer client");
                let _ = output.send(Message::QueueUnavailable(e.to_string())).await;
                return;
            }
        };

        let (notifier, mut events) = ChannelNotifier::channel();
        let queue = QueueCoordinator::spawn(&config, fetcher, Arc::new(notifier));
        if output.send(Message::QueueReady(queue)).await.is_err() {
            return;
        }

        while let Some(event) = events.recv().await {
            if output.send(Message::Queue(event)).await.is_err() {
                break;
            }
        }
    })
}

// Dialogs are fire-and-forget so the queue keeps draining while one is open
fn show_dialog(level: MessageLevel, title: &str, description: String) -> Task<Message> {
    let dialog = AsyncMessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok);

    Task::perform(dialog.show(), |_| Message::DialogClosed)
}
