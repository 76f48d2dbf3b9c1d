/// Presentation controller
///
/// Toolkit-independent state behind the main window: which phase the app is
/// in, the progress indicator, the thumbnail grid and the full-size view.
/// The window forwards user actions and worker events here and renders what
/// it finds.
///
/// ```text
/// Idle ──submit──▶ Running ──Finished(0 images)──▶ Idle
///                     └─────Finished(n images)──▶ DisplayingResults
/// ```
///
/// Only one run may be active: `submit` is refused while `Running`, no
/// matter how it was triggered.

use std::path::Path;

use super::data::{GeneratedImage, GenerationOutcome, GenerationRequest, SizeSpec};
use crate::error::{GenerationError, Result};
use crate::ui::viewer::FullView;

/// Upper end of the progress indicator, independent of the requested count
pub const PROGRESS_MAX: u32 = 4;

/// Thumbnails per grid row
pub const GRID_COLUMNS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing generated yet, or the last run produced nothing
    Idle,
    /// A worker is active
    Running,
    /// The last run produced at least one image
    DisplayingResults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressIndicator {
    pub value: u32,
    pub max: u32,
}

/// A generated image placed in the two-column grid
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub row: usize,
    pub column: usize,
    pub image: GeneratedImage,
}

/// Something the user should be told about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Input rejected before anything started
    Warning(String),
    Error(String),
    Success(String),
}

#[derive(Debug)]
pub struct Controller {
    phase: Phase,
    progress: Option<ProgressIndicator>,
    thumbnails: Vec<Thumbnail>,
    full_view: Option<FullView>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            progress: None,
            thumbnails: Vec::new(),
            full_view: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the generate button should be enabled
    pub fn can_submit(&self) -> bool {
        self.phase != Phase::Running
    }

    /// Progress indicator, `None` while hidden
    pub fn progress(&self) -> Option<ProgressIndicator> {
        self.progress
    }

    pub fn thumbnails(&self) -> &[Thumbnail] {
        &self.thumbnails
    }

    pub fn full_view(&self) -> Option<&FullView> {
        self.full_view.as_ref()
    }

    /// Validate a user request and move to `Running`
    ///
    /// On success the caller must start exactly one worker for the returned
    /// request. An empty prompt or an active run leaves the state untouched.
    pub fn submit(&mut self, prompt: &str, size: SizeSpec) -> Result<GenerationRequest> {
        if self.phase == Phase::Running {
            return Err(GenerationError::Busy);
        }
        let request = GenerationRequest::new(prompt, size)?;

        self.thumbnails.clear();
        self.full_view = None;
        self.progress = Some(ProgressIndicator {
            value: 0,
            max: PROGRESS_MAX,
        });
        self.phase = Phase::Running;

        Ok(request)
    }

    /// The worker is about to attempt image `index`
    pub fn on_progress(&mut self, index: u32) {
        if let Some(progress) = self.progress.as_mut() {
            progress.value = index;
        }
    }

    /// A single image failed. Only the `Finished` that follows changes state.
    pub fn on_error(&mut self, message: String) -> Option<Notice> {
        if self.phase != Phase::Running {
            return None;
        }
        Some(Notice::Error(message))
    }

    /// The run is over; take ownership of whatever it produced
    pub fn on_finished(&mut self, outcome: GenerationOutcome) -> Option<Notice> {
        if self.phase != Phase::Running {
            return None;
        }
        self.progress = None;
        self.full_view = None;

        if outcome.images.is_empty() {
            self.phase = Phase::Idle;
            return None;
        }

        let count = outcome.images.len();
        self.thumbnails = outcome
            .images
            .into_iter()
            .enumerate()
            .map(|(i, image)| Thumbnail {
                row: i / GRID_COLUMNS,
                column: i % GRID_COLUMNS,
                image,
            })
            .collect();
        self.phase = Phase::DisplayingResults;

        Some(Notice::Success(format!(
            "Generated {} images ({}) and saved them to the outputs folder.",
            count, outcome.size.label
        )))
    }

    /// The worker for the current run could not be started
    ///
    /// Closes the run as if it had produced nothing.
    pub fn on_start_failed(&mut self, error: &GenerationError) -> Option<Notice> {
        if self.phase != Phase::Running {
            return None;
        }
        self.progress = None;
        self.phase = Phase::Idle;
        Some(Notice::Error(format!("Could not start generation: {}", error)))
    }

    /// Whether `path` belongs to one of the displayed thumbnails
    pub fn is_displayed(&self, path: &Path) -> bool {
        self.thumbnails.iter().any(|t| t.image.path == path)
    }

    /// Show a loaded image full size
    ///
    /// Loads finish asynchronously; a view whose image is no longer in the
    /// grid (a new run started meanwhile) is dropped and `false` returned.
    pub fn show_full_view(&mut self, view: FullView) -> bool {
        if !self.is_displayed(&view.path) {
            return false;
        }
        self.full_view = Some(view);
        true
    }

    pub fn close_full_view(&mut self) {
        self.full_view = None;
    }
}
