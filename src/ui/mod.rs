use iced::{
    alignment::Vertical,
    widget::{button, column, container, row, scrollable, text, text_input, Column},
    Background, Color, Element, Length, Theme,
};

use crate::domain::{QueueEvent, RequestId, RequestStatus};

const PENDING_COLOR: Color = Color::from_rgb(0.85, 0.85, 0.85);
const IN_PROGRESS_COLOR: Color = Color::WHITE;
const SUCCEEDED_COLOR: Color = Color::from_rgb(0.0, 1.0, 0.0);
const FAILED_COLOR: Color = Color::from_rgb(1.0, 0.686, 0.686);

/// One row of the download list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadEntry {
    pub id: RequestId,
    pub url: String,
    pub status: RequestStatus,
}

/// Main view state
pub struct DownloadView {
    pub url_input: String,
    pub status_message: String,
    entries: Vec<DownloadEntry>,
}

impl Default for DownloadView {
    fn default() -> Self {
        Self {
            url_input: String::new(),
            status_message: "Enter a URL or browse for a file of URLs".to_string(),
            entries: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    DownloadPressed,
    BrowsePressed,
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::UrlChanged(url) => {
                self.url_input = url;
            }
            DownloadMessage::DownloadPressed | DownloadMessage::BrowsePressed => {
                // Will be handled by the app
            }
        }
    }

    /// Track a queue event. Rows are keyed by request id, so repeated URLs
    /// keep their own status.
    pub fn apply(&mut self, event: &QueueEvent) {
        let request = event.request();
        let status = match event {
            QueueEvent::Pending(_) => {
                self.entries.push(DownloadEntry {
                    id: request.id,
                    url: request.url.clone(),
                    status: RequestStatus::Pending,
                });
                return;
            }
            QueueEvent::Queued(_) => RequestStatus::InProgress,
            QueueEvent::Completed(_) => RequestStatus::Succeeded,
            QueueEvent::Failed(..) => RequestStatus::Failed,
        };

        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == request.id) {
            entry.status = status;
        }
    }

    #[cfg(test)]
    pub fn status_of(&self, id: RequestId) -> Option<RequestStatus> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.status)
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let input_row = row![
            text("Enter the URL of the file to download:").size(14),
            text_input("https://...", &self.url_input)
                .on_input(DownloadMessage::UrlChanged)
                .on_submit(DownloadMessage::DownloadPressed)
                .padding(10),
            button("Download")
                .on_press(DownloadMessage::DownloadPressed)
                .padding([10, 20]),
            button("Browse")
                .on_press(DownloadMessage::BrowsePressed)
                .padding([10, 20]),
        ]
        .spacing(10)
        .align_y(Vertical::Center);

        let list = Column::with_children(self.entries.iter().map(entry_row)).spacing(2);

        column![
            input_row,
            text(&self.status_message).size(14),
            scrollable(list).height(Length::Fill),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}

fn entry_row(entry: &DownloadEntry) -> Element<'_, DownloadMessage> {
    let color = match entry.status {
        RequestStatus::Pending => PENDING_COLOR,
        RequestStatus::InProgress => IN_PROGRESS_COLOR,
        RequestStatus::Succeeded => SUCCEEDED_COLOR,
        RequestStatus::Failed => FAILED_COLOR,
    };

    container(text(&entry.url).size(14))
        .width(Length::Fill)
        .padding(6)
        .style(move |_theme: &Theme| container::Style {
            background: Some(Background::Color(color)),
            text_color: Some(Color::BLACK),
            ..container::Style::default()
        })
        .into()
}
