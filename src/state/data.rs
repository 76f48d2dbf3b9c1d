/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the generation worker and the UI layer.

use image::RgbaImage;
use std::fmt;
use std::path::PathBuf;

use crate::config::IMAGES_PER_RUN;
use crate::error::{GenerationError, Result};

/// A fixed output resolution, selected by its human-readable label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeSpec {
    /// Label shown in the size picker (e.g., "HD (768x768)")
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Every resolution the app can request
pub const SIZES: &[SizeSpec] = &[
    SizeSpec { label: "SD (512x512)", width: 512, height: 512 },
    SizeSpec { label: "HD (768x768)", width: 768, height: 768 },
    SizeSpec { label: "FHD (1024x1024)", width: 1024, height: 1024 },
];

impl SizeSpec {
    /// The size preselected at startup
    pub const DEFAULT: SizeSpec = SIZES[1];

    /// Look up a size by its exact label
    pub fn from_label(label: &str) -> Option<SizeSpec> {
        SIZES.iter().copied().find(|size| size.label == label)
    }

    /// Look up a size by label, falling back to the default resolution
    pub fn resolve(label: &str) -> SizeSpec {
        Self::from_label(label).unwrap_or(Self::DEFAULT)
    }

    /// Leading token of the label, used in output file names ("HD" for "HD (768x768)")
    pub fn prefix(&self) -> &'static str {
        self.label.split(' ').next().unwrap_or(self.label)
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

/// One validated user request. Immutable once a worker starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
    size: SizeSpec,
    count: u32,
}

impl GenerationRequest {
    /// Validate a prompt and build a request for the default image count
    ///
    /// Leading and trailing whitespace is stripped; an empty result is rejected.
    pub fn new(prompt: &str, size: SizeSpec) -> Result<Self> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        Ok(Self {
            prompt: prompt.to_string(),
            size,
            count: IMAGES_PER_RUN,
        })
    }

    /// Request a different number of images (at least one)
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count.max(1);
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn size(&self) -> SizeSpec {
        self.size
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// A successfully generated image
#[derive(Clone, PartialEq)]
pub struct GeneratedImage {
    /// Absolute path of the full-resolution PNG on disk
    pub path: PathBuf,
    /// Decoded pixels scaled to the requested resolution
    pub pixels: RgbaImage,
}

// Pixel buffers are far too large to print
impl fmt::Debug for GeneratedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedImage")
            .field("path", &self.path)
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .finish()
    }
}

/// Everything one run produced, in completion order
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    pub images: Vec<GeneratedImage>,
    pub size: SizeSpec,
}

impl GenerationOutcome {
    /// A run that produced nothing
    #[cfg(test)]
    pub fn empty(size: SizeSpec) -> Self {
        Self { images: Vec::new(), size }
    }
}

/// Notifications sent from a generation worker to the UI, in order
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    /// About to attempt image N (1-based)
    Progress(u32),
    /// One image failed; the run ends right after this
    Error(String),
    /// Terminal event, sent exactly once per run
    Finished(GenerationOutcome),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_table() {
        let dims: Vec<(&str, u32, u32)> = SIZES.iter().map(|s| (s.prefix(), s.width, s.height)).collect();
        assert_eq!(dims, vec![("SD", 512, 512), ("HD", 768, 768), ("FHD", 1024, 1024)]);
        assert_eq!(SizeSpec::DEFAULT.label, "HD (768x768)");
    }

    #[test]
    fn test_size_lookup() {
        assert_eq!(SizeSpec::from_label("FHD (1024x1024)").map(|s| s.width), Some(1024));
        assert_eq!(SizeSpec::from_label("4K"), None);
        assert_eq!(SizeSpec::resolve("4K"), SizeSpec::DEFAULT);
        assert_eq!(SizeSpec::resolve("SD (512x512)").to_string(), "SD (512x512)");
    }

    #[test]
    fn test_request_validation() {
        assert!(matches!(
            GenerationRequest::new("   \t\n", SizeSpec::DEFAULT),
            Err(GenerationError::EmptyPrompt)
        ));
        assert!(matches!(
            GenerationRequest::new("", SizeSpec::DEFAULT),
            Err(GenerationError::EmptyPrompt)
        ));

        let request = GenerationRequest::new("  a red fox in snow ", SIZES[0]).unwrap();
        assert_eq!(request.prompt(), "a red fox in snow");
        assert_eq!(request.count(), 4);
        assert_eq!(request.size(), SIZES[0]);
    }

    #[test]
    fn test_request_count_is_positive() {
        let request = GenerationRequest::new("castle", SizeSpec::DEFAULT).unwrap();
        assert_eq!(request.clone().with_count(7).count(), 7);
        assert_eq!(request.with_count(0).count(), 1);
    }
}
