/// Image generation module
///
/// This module handles:
/// - Randomized prompt variations (prompt.rs)
/// - The remote image service client (service.rs)
/// - Naming and saving output files (storage.rs)
/// - The background worker that ties them together (worker.rs)

pub mod prompt;
pub mod service;
pub mod storage;
pub mod worker;

pub use service::HttpImageService;
pub use worker::GenerationWorker;
