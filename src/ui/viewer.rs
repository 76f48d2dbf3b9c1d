/// Full-size image viewer
///
/// Reloads a saved PNG from disk and computes how large it can be drawn
/// inside the preview area without distorting it.

use image::RgbaImage;
use std::path::PathBuf;

/// Share of the available area the full view may cover
pub const VIEWPORT_FRACTION: f32 = 0.9;

/// Used when the available display size is unknown
pub const FALLBACK_BOUNDS: (u32, u32) = (1200, 900);

/// Thumbnails are drawn inside this box
pub const THUMBNAIL_BOUNDS: (u32, u32) = (400, 400);

/// A saved image loaded back at full resolution
#[derive(Clone)]
pub struct FullView {
    pub path: PathBuf,
    pub pixels: RgbaImage,
}

impl FullView {
    /// On-screen size inside `available`, the measured preview area
    pub fn fitted(&self, available: Option<(f32, f32)>) -> (u32, u32) {
        fit_within(self.pixels.width(), self.pixels.height(), full_view_bounds(available))
    }
}

impl std::fmt::Debug for FullView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FullView")
            .field("path", &self.path)
            .field("dimensions", &self.pixels.dimensions())
            .finish()
    }
}

/// Scale `(width, height)` to the largest size that fits in `bounds`, keeping the aspect ratio
///
/// Small images are scaled up as well as large ones down.
pub fn fit_within(width: u32, height: u32, bounds: (u32, u32)) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let scale = f64::min(
        bounds.0 as f64 / width as f64,
        bounds.1 as f64 / height as f64,
    );

    let w = ((width as f64 * scale).round() as u32).clamp(1, bounds.0.max(1));
    let h = ((height as f64 * scale).round() as u32).clamp(1, bounds.1.max(1));
    (w, h)
}

/// Box the full view may occupy: 90% of the available area
pub fn full_view_bounds(available: Option<(f32, f32)>) -> (u32, u32) {
    match available {
        Some((w, h)) if w >= 1.0 && h >= 1.0 => (
            (w * VIEWPORT_FRACTION).round() as u32,
            (h * VIEWPORT_FRACTION).round() as u32,
        ),
        _ => FALLBACK_BOUNDS,
    }
}

/// Load an image from disk at full resolution
///
/// Runs in a blocking task so the UI thread never waits on disk I/O.
pub async fn load_full_view(path: PathBuf) -> Result<FullView, String> {
    tokio::task::spawn_blocking(move || load_full_view_blocking(path))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

fn load_full_view_blocking(path: PathBuf) -> Result<FullView, String> {
    let pixels = image::open(&path)
        .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?
        .to_rgba8();

    Ok(FullView { path, pixels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    #[test]
    fn test_fit_preserves_aspect_ratio() {
        assert_eq!(fit_within(1024, 1024, (990, 675)), (675, 675));
        assert_eq!(fit_within(2000, 1000, (400, 400)), (400, 200));
        assert_eq!(fit_within(1000, 2000, (400, 400)), (200, 400));
        // Upscales like the thumbnail grid does
        assert_eq!(fit_within(100, 50, (400, 400)), (400, 200));
        assert_eq!(fit_within(0, 50, (400, 400)), (0, 0));
    }

    #[test]
    fn test_full_view_bounds() {
        assert_eq!(full_view_bounds(Some((1100.0, 750.0))), (990, 675));
        assert_eq!(full_view_bounds(None), FALLBACK_BOUNDS);
        assert_eq!(full_view_bounds(Some((0.0, 0.0))), FALLBACK_BOUNDS);
    }

    #[tokio::test]
    async fn test_saved_image_reloads_within_preview_area() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("20240101_000000_000001_HD_1.png");
        DynamicImage::ImageRgb8(RgbImage::from_pixel(768, 512, image::Rgb([1, 2, 3])))
            .save(&path)
            .unwrap();

        let view = load_full_view(path.clone()).await.unwrap();

        assert_eq!(view.path, path);
        assert_eq!(view.pixels.dimensions(), (768, 512));
        assert_eq!(view.fitted(Some((800.0, 600.0))), (720, 480));
    }

    #[test]
    fn test_fit_follows_preview_area_not_window() {
        let view = FullView {
            path: PathBuf::from("/tmp/outputs/20240101_000000_000001_FHD_1.png"),
            pixels: RgbaImage::new(1024, 1024),
        };

        // 1100x750 window minus header, inputs and footer
        let preview = (1060.0, 420.0);
        assert_eq!(view.fitted(Some(preview)), (378, 378));
        assert_ne!(view.fitted(Some(preview)), view.fitted(Some((1100.0, 750.0))));
        assert_eq!(view.fitted(None), (900, 900));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let result = load_full_view(PathBuf::from("/nonexistent/image.png")).await;
        assert!(result.is_err());
    }
}
