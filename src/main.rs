use iced::widget::{button, column, container, image as iced_image, pick_list, progress_bar, row, text, text_input};
use iced::{alignment, Alignment, Element, Length, Size, Task, Theme};
use rfd::{AsyncMessageDialog, MessageButtons, MessageLevel};
use std::collections::VecDeque;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod generation;
mod shell;
mod state;
mod ui;

use config::AppConfig;
use error::GenerationError;
use generation::{GenerationWorker, HttpImageService};
use state::controller::{Controller, Notice, Phase};
use state::data::{GenerationRequest, SizeSpec, WorkerEvent, SIZES};
use ui::gallery;
use ui::viewer::{self, FullView};

const WINDOW_SIZE: Size = Size::new(1100.0, 750.0);

/// Main application state
struct ImageCreator {
    config: AppConfig,
    controller: Controller,
    /// Prompt text as typed
    prompt: String,
    size: SizeSpec,
    /// Display handles, parallel to the controller's thumbnails
    thumbnail_handles: Vec<iced_image::Handle>,
    full_view_handle: Option<iced_image::Handle>,
    /// Dialogs waiting for the current one to close
    notices: VecDeque<Notice>,
    notice_open: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    PromptChanged(String),
    SizeSelected(SizeSpec),
    /// User pressed Generate (or Enter in the prompt field)
    Generate,
    /// Event from the active generation worker
    Worker(WorkerEvent),
    OpenOutputFolder,
    /// User clicked a thumbnail
    OpenFullView(PathBuf),
    FullViewLoaded(Result<FullView, String>),
    CloseFullView,
    NoticeClosed,
}

impl ImageCreator {
    /// Create a new instance of the application
    fn new(config: AppConfig) -> (Self, Task<Message>) {
        (
            ImageCreator {
                controller: Controller::new(),
                prompt: String::new(),
                size: config.default_size,
                thumbnail_handles: Vec::new(),
                full_view_handle: None,
                notices: VecDeque::new(),
                notice_open: false,
                config,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PromptChanged(prompt) => {
                self.prompt = prompt;
                Task::none()
            }
            Message::SizeSelected(size) => {
                self.size = size;
                Task::none()
            }
            Message::Generate => match self.controller.submit(&self.prompt, self.size) {
                Ok(request) => {
                    self.thumbnail_handles.clear();
                    self.full_view_handle = None;
                    self.start_worker(request.with_count(self.config.images_per_run))
                }
                Err(GenerationError::Busy) => {
                    warn!("Generate pressed while a run is active, ignoring");
                    Task::none()
                }
                Err(e) => self.notify(Notice::Warning(e.to_string())),
            },
            Message::Worker(WorkerEvent::Progress(index)) => {
                self.controller.on_progress(index);
                Task::none()
            }
            Message::Worker(WorkerEvent::Error(message)) => match self.controller.on_error(message) {
                Some(notice) => self.notify(notice),
                None => Task::none(),
            },
            Message::Worker(WorkerEvent::Finished(outcome)) => {
                let notice = self.controller.on_finished(outcome);
                self.thumbnail_handles = self
                    .controller
                    .thumbnails()
                    .iter()
                    .map(|t| gallery::handle_for(&t.image.pixels))
                    .collect();

                match notice {
                    Some(notice) => self.notify(notice),
                    None => Task::none(),
                }
            }
            Message::OpenOutputFolder => match shell::open_folder(&self.config.output_dir) {
                Ok(()) => Task::none(),
                Err(e) => {
                    error!("{}", e);
                    self.notify(Notice::Error(e.to_string()))
                }
            },
            Message::OpenFullView(path) => {
                if !self.controller.is_displayed(&path) {
                    return Task::none();
                }
                Task::perform(viewer::load_full_view(path), Message::FullViewLoaded)
            }
            Message::FullViewLoaded(Ok(view)) => {
                if !self.controller.is_displayed(&view.path) {
                    info!("Discarding full view of {}, no longer displayed", view.path.display());
                    return Task::none();
                }
                let handle = gallery::handle_for(&view.pixels);
                if self.controller.show_full_view(view) {
                    self.full_view_handle = Some(handle);
                }
                Task::none()
            }
            Message::FullViewLoaded(Err(e)) => {
                error!("{}", e);
                self.notify(Notice::Error(e))
            }
            Message::CloseFullView => {
                self.controller.close_full_view();
                self.full_view_handle = None;
                Task::none()
            }
            Message::NoticeClosed => {
                self.notice_open = false;
                self.show_next_notice()
            }
        }
    }

    /// Spawn the worker thread and stream its events back as messages
    fn start_worker(&mut self, request: GenerationRequest) -> Task<Message> {
        let spawned = HttpImageService::new(&self.config).and_then(|service| {
            GenerationWorker::new(request, self.config.output_dir.clone(), service).spawn()
        });

        match spawned {
            Ok(receiver) => {
                let events = futures_util::stream::unfold(receiver, |mut receiver| async move {
                    receiver.recv().await.map(|event| (event, receiver))
                });
                Task::run(events, Message::Worker)
            }
            Err(e) => {
                error!("Failed to start generation worker: {}", e);
                match self.controller.on_start_failed(&e) {
                    Some(notice) => self.notify(notice),
                    None => Task::none(),
                }
            }
        }
    }

    /// Queue a dialog; dialogs are shown one at a time, in order
    fn notify(&mut self, notice: Notice) -> Task<Message> {
        self.notices.push_back(notice);
        self.show_next_notice()
    }

    fn show_next_notice(&mut self) -> Task<Message> {
        if self.notice_open {
            return Task::none();
        }
        let Some(notice) = self.notices.pop_front() else {
            return Task::none();
        };
        self.notice_open = true;

        let (level, title, description) = match notice {
            Notice::Warning(message) => (MessageLevel::Warning, "Warning", message),
            Notice::Error(message) => (MessageLevel::Error, "Generation error", message),
            Notice::Success(message) => (MessageLevel::Info, "Done", message),
        };

        // The dialog only opens once the task is polled by the runtime
        Task::perform(
            async move {
                AsyncMessageDialog::new()
                    .set_level(level)
                    .set_title(title)
                    .set_description(description)
                    .set_buttons(MessageButtons::Ok)
                    .show()
                    .await
            },
            |_| Message::NoticeClosed,
        )
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let header = column![
            text("AI Image Creator Pro").size(32),
            text("Type a description, pick a size, get a batch of variations").size(14),
        ]
        .spacing(5);

        let generate = button(text(format!("Generate ({})", self.config.images_per_run)))
            .padding(10)
            .width(Length::FillPortion(1))
            .on_press_maybe(self.controller.can_submit().then_some(Message::Generate));

        let inputs = row![
            text_input("Detailed description of the image...", &self.prompt)
                .on_input(Message::PromptChanged)
                .on_submit(Message::Generate)
                .padding(10)
                .width(Length::FillPortion(3)),
            pick_list(SIZES, Some(self.size), Message::SizeSelected)
                .padding(10)
                .width(Length::FillPortion(1)),
            generate,
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let folder = button(text("Open output folder").size(13))
            .on_press(Message::OpenOutputFolder)
            .padding(8);

        let progress: Element<Message> = match self.controller.progress() {
            Some(progress) => column![
                progress_bar(0.0..=progress.max as f32, progress.value as f32).height(Length::Fixed(18.0)),
                text(format!("Generating... image {} of {}", progress.value, progress.max)).size(13),
            ]
            .spacing(5)
            .into(),
            None => column![].into(),
        };

        let preview: Element<Message> = match (self.controller.full_view(), &self.full_view_handle) {
            (Some(view), Some(handle)) => gallery::full_view(view, handle),
            _ if !self.controller.thumbnails().is_empty() => {
                gallery::thumbnail_grid(self.controller.thumbnails(), &self.thumbnail_handles)
            }
            _ if self.controller.phase() == Phase::Running => column![].into(),
            _ => gallery::placeholder(),
        };

        let footer = container(text("AI powered | API: Pollinations | Theme: Dark").size(11))
            .width(Length::Fill)
            .align_x(alignment::Horizontal::Right);

        let content = column![
            header,
            inputs,
            folder,
            progress,
            container(preview)
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill),
            footer,
        ]
        .spacing(15)
        .padding(20);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_creator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    config.ensure_output_dir()?;
    info!("📁 Saving images to {}", config.output_dir.display());

    iced::application("AI Image Creator Pro", ImageCreator::update, ImageCreator::view)
        .theme(ImageCreator::theme)
        .window_size(WINDOW_SIZE)
        .centered()
        .run_with(move || ImageCreator::new(config))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use state::data::{GeneratedImage, GenerationOutcome};
    use std::path::Path;

    /// Output into `dir`; the service URL points at a port nothing answers on
    fn app(dir: &Path) -> ImageCreator {
        let output = dir.to_string_lossy().to_string();
        let config = AppConfig::from_lookup(move |key| match key {
            "IMAGE_CREATOR_OUTPUT_DIR" => Some(output.clone()),
            "IMAGE_CREATOR_SERVICE_URL" => Some("http://127.0.0.1:9/prompt/".to_string()),
            _ => None,
        })
        .unwrap();
        ImageCreator::new(config).0
    }

    fn outcome(dir: &Path, tag: &str, n: usize) -> GenerationOutcome {
        GenerationOutcome {
            images: (1..=n)
                .map(|i| GeneratedImage {
                    path: dir.join(format!("20240101_000000_00000{}_{}_{}.png", i, tag, i)),
                    pixels: RgbaImage::new(4, 4),
                })
                .collect(),
            size: SizeSpec::DEFAULT,
        }
    }

    fn full_view(path: &Path) -> FullView {
        FullView {
            path: path.to_path_buf(),
            pixels: RgbaImage::new(8, 8),
        }
    }

    #[test]
    fn test_generate_clears_previous_results() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.prompt = "castle".to_string();

        let _ = app.update(Message::Generate);
        let first = outcome(dir.path(), "HD", 2);
        let clicked = first.images[0].path.clone();
        let _ = app.update(Message::Worker(WorkerEvent::Finished(first)));
        assert_eq!(app.thumbnail_handles.len(), 2);

        let _ = app.update(Message::FullViewLoaded(Ok(full_view(&clicked))));
        assert!(app.full_view_handle.is_some());

        app.prompt = "forest".to_string();
        let _ = app.update(Message::Generate);

        assert!(app.thumbnail_handles.is_empty());
        assert!(app.full_view_handle.is_none());
        assert_eq!(app.controller.phase(), Phase::Running);

        // The earlier click finishes loading after the new run started
        let _ = app.update(Message::FullViewLoaded(Ok(full_view(&clicked))));
        assert!(app.full_view_handle.is_none());
        assert!(app.controller.full_view().is_none());
    }

    #[test]
    fn test_notices_are_shown_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.prompt = "castle".to_string();
        let _ = app.update(Message::Generate);

        let _ = app.update(Message::Worker(WorkerEvent::Error("Image 3: timed out".to_string())));
        assert!(app.notice_open);
        assert!(app.notices.is_empty());

        let _ = app.update(Message::Worker(WorkerEvent::Finished(outcome(dir.path(), "HD", 2))));
        assert_eq!(app.notices.len(), 1);
        assert!(matches!(app.notices.front(), Some(Notice::Success(_))));

        // Closing the error dialog brings up the success summary
        let _ = app.update(Message::NoticeClosed);
        assert!(app.notice_open);
        assert!(app.notices.is_empty());

        let _ = app.update(Message::NoticeClosed);
        assert!(!app.notice_open);
    }

    #[test]
    fn test_blank_prompt_warns_without_starting() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.prompt = "   ".to_string();

        let _ = app.update(Message::Generate);

        assert_eq!(app.controller.phase(), Phase::Idle);
        assert!(app.notice_open);
    }
}
