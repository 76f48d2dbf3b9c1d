/// Desktop shell integration

use std::path::Path;
use tracing::info;

use crate::error::{GenerationError, Result};

/// Reveal a folder in the platform file manager
pub fn open_folder(path: &Path) -> Result<()> {
    let path = std::fs::canonicalize(path).map_err(|source| GenerationError::Shell {
        path: path.to_path_buf(),
        source,
    })?;

    open::that(&path).map_err(|source| GenerationError::Shell {
        path: path.clone(),
        source,
    })?;

    info!("📂 Opened {}", path.display());
    Ok(())
}
