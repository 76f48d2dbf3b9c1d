/// Widgets for the main window
///
/// - Thumbnail grid and full-size view (gallery.rs)
/// - Full view loading and fit calculations (viewer.rs)

pub mod gallery;
pub mod viewer;
