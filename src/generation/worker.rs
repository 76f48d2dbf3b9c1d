/// Background generation worker
///
/// A worker performs one run: `count` sequential fetch-decode-save steps,
/// reporting through an unbounded channel. It owns its accumulated images
/// until the single `Finished` event hands them to the receiver.
///
/// The first failed image ends the run. Images saved before it are kept
/// and delivered with `Finished`.

use image::imageops::FilterType;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::thread;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use super::prompt::PromptVariation;
use super::service::ImageService;
use super::storage;
use crate::error::Result;
use crate::state::data::{GeneratedImage, GenerationOutcome, GenerationRequest, WorkerEvent};

pub struct GenerationWorker<S> {
    request: GenerationRequest,
    output_dir: PathBuf,
    service: S,
    rng: StdRng,
}

impl<S: ImageService> GenerationWorker<S> {
    pub fn new(request: GenerationRequest, output_dir: PathBuf, service: S) -> Self {
        Self {
            request,
            output_dir,
            service,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a fixed seed for the prompt variations (reproducible runs)
    #[cfg(test)]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Execute the whole run, sending every event to `events`
    ///
    /// Always ends with exactly one `Finished`.
    pub async fn run(mut self, events: &UnboundedSender<WorkerEvent>) {
        let size = self.request.size();
        let count = self.request.count();
        let mut images: Vec<GeneratedImage> = Vec::with_capacity(count as usize);

        info!(
            "🔄 Generating {} images at {}x{} for \"{}\"",
            count,
            size.width,
            size.height,
            self.request.prompt()
        );

        for index in 1..=count {
            emit(events, WorkerEvent::Progress(index));
            info!("  [image {}/{}] ...", index, count);

            match self.generate_one(index).await {
                Ok(image) => images.push(image),
                Err(e) => {
                    let message = format!("Image {}: {}", index, e);
                    warn!("❌ {}", message);
                    emit(events, WorkerEvent::Error(message));
                    break;
                }
            }
        }

        info!("✅ Run finished with {}/{} images", images.len(), count);
        emit(events, WorkerEvent::Finished(GenerationOutcome { images, size }));
    }

    /// Fetch, decode, save and scale one image
    async fn generate_one(&mut self, index: u32) -> Result<GeneratedImage> {
        let size = self.request.size();
        let variation = PromptVariation::random(&mut self.rng);
        let prompt = variation.apply(self.request.prompt());
        debug!("Prompt for image {}: {}", index, prompt);

        let bytes = self.service.fetch(&prompt).await?;

        let decoded = image::load_from_memory(&bytes)?;
        let path = storage::save_full_resolution(&self.output_dir, &decoded, &size, index)?;
        let pixels = decoded
            .resize_exact(size.width, size.height, FilterType::Lanczos3)
            .to_rgba8();

        info!("💾 Saved {}", path.display());
        Ok(GeneratedImage { path, pixels })
    }
}

impl<S: ImageService + 'static> GenerationWorker<S> {
    /// Start the run on its own thread and return the event receiver
    ///
    /// The receiver yields `None` once the worker has sent `Finished` and exited.
    pub fn spawn(self) -> Result<UnboundedReceiver<WorkerEvent>> {
        let (sender, receiver) = mpsc::unbounded_channel();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("generation-worker".to_string())
            .spawn(move || runtime.block_on(self.run(&sender)))?;

        Ok(receiver)
    }
}

fn emit(events: &UnboundedSender<WorkerEvent>, event: WorkerEvent) {
    if events.send(event).is_err() {
        debug!("Event receiver dropped, nobody is listening");
    }
}
