//! Movement heatmap as a PNG image.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use tracing::info;

use super::colormap::{hot, over_white};
use super::ensure_parent;
use crate::analysis::{bilinear_sample, movement_density, Grid};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::Session;

/// Paint a normalised density grid into an image.
///
/// Row 0 of the grid is the top of the screen. Colors come from the "hot"
/// map blended at `alpha` over white.
#[must_use]
pub fn density_image(grid: &Grid, width: u32, height: u32, alpha: f64) -> RgbImage {
    RgbImage::from_fn(width, height, |px, py| {
        let value = bilinear_sample(grid, px, py, width, height);
        Rgb(over_white(hot(value), alpha))
    })
}

/// Build the heatmap image for a session.
///
/// # Errors
///
/// Returns [`Error::NoData`] if the session has no movements.
pub fn movement_heatmap(session: &Session, config: &Config) -> Result<RgbImage> {
    if session.is_empty() {
        return Err(Error::NoData { what: "movement" });
    }
    let heatmap = &config.heatmap;
    let grid = movement_density(
        &session.moves,
        config.screen_extent(),
        heatmap.grid_size,
        heatmap.sigma,
    );
    Ok(density_image(
        &grid,
        heatmap.image_width,
        heatmap.image_height,
        heatmap.alpha,
    ))
}

/// Render the movement heatmap of a session to a PNG file.
///
/// # Errors
///
/// Returns [`Error::NoData`] if the session has no movements, or an error if
/// the file cannot be written.
pub fn render_movement_heatmap(session: &Session, config: &Config, path: &Path) -> Result<()> {
    let image = movement_heatmap(session, config)?;
    ensure_parent(path)?;
    image.save_with_format(path, ImageFormat::Png)?;
    info!("Movement heatmap saved as {}", path.display());
    Ok(())
}

/// Encode an image as PNG bytes.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
