//! Heatmap and dashboard rendering.

pub mod colormap;
pub mod dashboard;
pub mod heatmap;

use std::path::{Path, PathBuf};

pub use dashboard::{dashboard_html, render_dashboard};
pub use heatmap::{movement_heatmap, render_movement_heatmap};

use crate::error::{Error, Result};

/// Timestamp format used in default output names.
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Default name for a rendered file: `<dir>/<stem>_<timestamp>.<ext>`.
#[must_use]
pub fn default_output_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let stamp = chrono::Local::now().format(OUTPUT_TIMESTAMP_FORMAT);
    dir.join(format!("{stem}_{stamp}.{extension}"))
}

/// Default path for a movement heatmap PNG.
#[must_use]
pub fn default_heatmap_path(dir: &Path) -> PathBuf {
    default_output_path(dir, "movement_heatmap", "png")
}

/// Default path for a dashboard HTML file.
#[must_use]
pub fn default_dashboard_path(dir: &Path) -> PathBuf {
    default_output_path(dir, "dashboard", "html")
}

/// Create the parent directory of an output file.
pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
