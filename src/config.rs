/// Process-wide configuration, resolved once at startup
///
/// The output directory, remote service URL and request timeout are read
/// from the environment (a `.env` file is honoured) and then passed by value
/// to the controller and every worker. Nothing here changes after startup.

use reqwest::Url;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{GenerationError, Result};
use crate::state::data::SizeSpec;

/// Remote image service; the escaped prompt is appended as the last path segment
pub const DEFAULT_SERVICE_URL: &str = "https://image.pollinations.ai/prompt/";

/// Per-request network timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Images requested per run
pub const IMAGES_PER_RUN: u32 = 4;

const ENV_OUTPUT_DIR: &str = "IMAGE_CREATOR_OUTPUT_DIR";
const ENV_SERVICE_URL: &str = "IMAGE_CREATOR_SERVICE_URL";
const ENV_TIMEOUT_SECS: &str = "IMAGE_CREATOR_TIMEOUT_SECS";
const ENV_DEFAULT_SIZE: &str = "IMAGE_CREATOR_DEFAULT_SIZE";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Absolute path of the folder generated images are saved to
    pub output_dir: PathBuf,
    pub service_url: Url,
    pub request_timeout: Duration,
    pub images_per_run: u32,
    /// Size preselected in the picker
    pub default_size: SizeSpec,
}

impl AppConfig {
    /// Resolve the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let output_dir = match lookup(ENV_OUTPUT_DIR) {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
            _ => default_output_dir(),
        };
        let output_dir = std::path::absolute(&output_dir)?;

        let service_url = lookup(ENV_SERVICE_URL).unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());
        let service_url = Url::parse(service_url.trim()).map_err(|e| {
            GenerationError::Config(format!("{} is not a valid URL: {}", ENV_SERVICE_URL, e))
        })?;
        if service_url.cannot_be_a_base() {
            return Err(GenerationError::Config(format!(
                "{} cannot carry a prompt path: {}",
                ENV_SERVICE_URL, service_url
            )));
        }

        let request_timeout = match lookup(ENV_TIMEOUT_SECS) {
            Some(secs) => {
                let secs: u64 = secs.trim().parse().map_err(|_| {
                    GenerationError::Config(format!("{} must be a whole number of seconds", ENV_TIMEOUT_SECS))
                })?;
                if secs == 0 {
                    return Err(GenerationError::Config(format!("{} must be positive", ENV_TIMEOUT_SECS)));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        // Unknown labels fall back to the default rather than failing startup
        let default_size = lookup(ENV_DEFAULT_SIZE)
            .map(|label| SizeSpec::resolve(label.trim()))
            .unwrap_or(SizeSpec::DEFAULT);

        Ok(Self {
            output_dir,
            service_url,
            request_timeout,
            images_per_run: IMAGES_PER_RUN,
            default_size,
        })
    }

    /// Create the output directory if it doesn't exist yet
    pub fn ensure_output_dir(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(&self.output_dir)
    }
}

/// `outputs` next to the executable, like a portable app
fn default_output_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("outputs")))
        .or_else(|| dirs::picture_dir().map(|dir| dir.join("image-creator")))
        .unwrap_or_else(|| PathBuf::from("outputs"))
}
