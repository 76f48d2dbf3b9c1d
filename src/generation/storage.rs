/// Output files
///
/// Generated images are saved full size as PNG into the output folder,
/// named by timestamp, size prefix and position in the run.

use chrono::{DateTime, Local};
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::state::data::SizeSpec;

/// File name for one saved image: `{YYYYMMDD_HHMMSS_ffffff}_{prefix}_{index}.png`
///
/// Microsecond timestamps keep names unique across rapid successive saves.
pub fn output_file_name(timestamp: DateTime<Local>, size: &SizeSpec, index: u32) -> String {
    format!(
        "{}_{}_{}.png",
        timestamp.format("%Y%m%d_%H%M%S_%6f"),
        size.prefix(),
        index
    )
}

/// Save the full-resolution decoded image as PNG into the output folder
///
/// Returns the path of the written file.
pub fn save_full_resolution(
    output_dir: &Path,
    image: &DynamicImage,
    size: &SizeSpec,
    index: u32,
) -> Result<PathBuf> {
    let path = output_dir.join(output_file_name(Local::now(), size, index));
    image.save_with_format(&path, ImageFormat::Png)?;
    Ok(path)
}
