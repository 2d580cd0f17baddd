use iced::widget::{button, column, row, scrollable, text, text_input};
use iced::{Element, Task};

use luna_core::{
    DEFAULT_INTERVAL_SECONDS, Provider, VideoSource, WorkDirs, rewrite_summary, summarize_video,
    turn_into_story,
};

fn main() -> iced::Result {
    iced::application(App::new, App::update, App::view)
        .title("Luna")
        .run()
}

#[derive(Default)]
struct App {
    url: String,
    upload_path: String,
    interval: String,
    summary: Option<String>,
    error: Option<String>,
    busy: bool,
}

#[derive(Debug, Clone)]
enum Message {
    UrlChanged(String),
    UploadPathChanged(String),
    IntervalChanged(String),
    SummarizeUrl,
    SummarizeUpload,
    Rewrite,
    Story,
    SummaryReady(Result<String, String>),
    TransformReady(Result<String, String>),
}

fn work_dirs() -> WorkDirs {
    WorkDirs::new("videos", "frames")
}

impl App {
    fn new() -> (Self, Task<Message>) {
        (
            Self {
                interval: format!("{DEFAULT_INTERVAL_SECONDS:.0}"),
                ..Self::default()
            },
            Task::none(),
        )
    }

    fn parsed_interval(&self) -> f64 {
        self.interval
            .trim()
            .parse()
            .ok()
            .filter(|i: &f64| *i > 0.0)
            .unwrap_or(DEFAULT_INTERVAL_SECONDS)
    }

    fn summarize(&mut self, source_path: Option<String>) -> Task<Message> {
        // Buttons are disabled while busy, so only one operation touches the
        // frame directory and the summary at a time.
        self.busy = true;
        self.error = None;

        let url = self.url.clone();
        let interval = self.parsed_interval();
        Task::perform(
            async move {
                let dirs = work_dirs();
                dirs.ensure().await.map_err(|e| e.to_string())?;
                let source = match source_path {
                    Some(path) => {
                        let file_name = std::path::Path::new(&path)
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_else(|| "upload.mp4".to_string());
                        let bytes = tokio::fs::read(&path).await.map_err(|e| e.to_string())?;
                        VideoSource::Upload { file_name, bytes }
                    }
                    None => VideoSource::Url(url),
                };
                summarize_video(&source, &dirs, interval, &Provider::Groq)
                    .await
                    .map_err(|e| e.to_string())
            },
            Message::SummaryReady,
        )
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::UrlChanged(url) => self.url = url,
            Message::UploadPathChanged(path) => self.upload_path = path,
            Message::IntervalChanged(interval) => self.interval = interval,
            Message::SummarizeUrl => return self.summarize(None),
            Message::SummarizeUpload => {
                let path = self.upload_path.clone();
                return self.summarize(Some(path));
            }
            Message::Rewrite | Message::Story => {
                let Some(summary) = self.summary.clone() else {
                    return Task::none();
                };
                self.busy = true;
                self.error = None;
                let story = matches!(message, Message::Story);
                return Task::perform(
                    async move {
                        let result = if story {
                            turn_into_story(&summary, &Provider::Groq).await
                        } else {
                            rewrite_summary(&summary, &Provider::Groq).await
                        };
                        result.map_err(|e| e.to_string())
                    },
                    Message::TransformReady,
                );
            }
            Message::SummaryReady(result) | Message::TransformReady(result) => {
                self.busy = false;
                match result {
                    Ok(summary) => self.summary = Some(summary),
                    // A failed call keeps the previous summary.
                    Err(e) => self.error = Some(e),
                }
            }
        }
        Task::none()
    }

    fn view(&self) -> Element<'_, Message> {
        let idle = !self.busy;
        let has_summary = self.summary.is_some();

        let mut content = column![
            text("Luna - Video Summarizer").size(24),
            row![
                text_input("Enter YouTube URL...", &self.url).on_input(Message::UrlChanged),
                button("Summarize URL").on_press_maybe(idle.then_some(Message::SummarizeUrl)),
            ]
            .spacing(10),
            row![
                text_input("Path to a local video file...", &self.upload_path)
                    .on_input(Message::UploadPathChanged),
                button("Summarize file").on_press_maybe(idle.then_some(Message::SummarizeUpload)),
            ]
            .spacing(10),
            row![
                text("Sampling interval (s):"),
                text_input("5", &self.interval).on_input(Message::IntervalChanged),
                button("Rewrite")
                    .on_press_maybe((idle && has_summary).then_some(Message::Rewrite)),
                button("Story").on_press_maybe((idle && has_summary).then_some(Message::Story)),
            ]
            .spacing(10),
        ]
        .padding(20)
        .spacing(10);

        if self.busy {
            content = content.push(text("Working..."));
        }
        if let Some(error) = &self.error {
            content = content.push(text(format!("Error: {error}")));
        }
        if let Some(summary) = &self.summary {
            content = content.push(scrollable(text(summary.clone())));
        }

        content.into()
    }
}
