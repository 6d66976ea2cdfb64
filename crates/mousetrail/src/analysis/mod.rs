//! Numeric kernels behind the heatmap and dashboard.
//!
//! Binning follows numpy's conventions and smoothing follows scipy's
//! `gaussian_filter` in reflect mode, so output lines up with heatmaps
//! produced by the usual Python tooling for the same session files.

pub mod hexbin;
pub mod histogram;
pub mod smooth;

pub use hexbin::{hexbin, Extent, HexBin, HexGrid};
pub use histogram::{histogram, histogram2d, linspace, Histogram};
pub use smooth::{bilinear_sample, gaussian_filter};

use crate::event::MouseMove;

/// Dense row-major 2D grid of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Grid {
    /// A `rows x cols` grid of zeros.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Check whether the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Mutable value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut f64 {
        &mut self.data[row * self.cols + col]
    }

    /// One row as a slice.
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// One row as a mutable slice.
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Largest value, or 0 for an empty grid.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }

    /// Sum of all values.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Scale so the largest value becomes 1. An all-zero grid is left alone.
    pub fn normalize(&mut self) {
        let max = self.max();
        if max > 0.0 {
            for v in &mut self.data {
                *v /= max;
            }
        }
    }
}

/// Movement density over the screen: a 2D histogram of move positions on
/// `grid_size` edges per axis, smoothed with `sigma` and normalised to 1.
#[must_use]
pub fn movement_density(
    moves: &[MouseMove],
    screen: (f64, f64),
    grid_size: usize,
    sigma: f64,
) -> Grid {
    let x_edges = linspace(0.0, screen.0, grid_size);
    let y_edges = linspace(0.0, screen.1, grid_size);
    let points: Vec<(f64, f64)> = moves.iter().map(|m| (m.x, m.y)).collect();

    let mut grid = gaussian_filter(&histogram2d(&points, &x_edges, &y_edges), sigma);
    grid.normalize();
    grid
}

/// Thin a long path for plotting.
///
/// Paths of `min_points` moves or fewer are not worth drawing and give an
/// empty result; longer ones keep every `n / max_points`-th move.
#[must_use]
pub fn sample_path(moves: &[MouseMove], min_points: usize, max_points: usize) -> Vec<(f64, f64)> {
    if moves.len() <= min_points {
        return Vec::new();
    }
    let step = (moves.len() / max_points.max(1)).max(1);
    moves.iter().step_by(step).map(|m| (m.x, m.y)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(x: f64, y: f64) -> MouseMove {
        MouseMove {
            x,
            y,
            timestamp: 0.0,
            speed: 0.0,
        }
    }

    #[test]
    fn test_grid_accessors() {
        let mut grid = Grid::zeros(2, 3);
        *grid.get_mut(1, 2) = 4.0;
        grid.row_mut(0)[1] = 2.0;

        assert_eq!(grid.get(1, 2), 4.0);
        assert_eq!(grid.row(0), &[0.0, 2.0, 0.0]);
        assert_eq!(grid.max(), 4.0);
        assert_eq!(grid.sum(), 6.0);
    }

    #[test]
    fn test_normalize() {
        let mut grid = Grid::zeros(1, 2);
        *grid.get_mut(0, 0) = 2.0;
        *grid.get_mut(0, 1) = 8.0;
        grid.normalize();
        assert_eq!(grid.row(0), &[0.25, 1.0]);

        let mut zeros = Grid::zeros(2, 2);
        zeros.normalize();
        assert_eq!(zeros.sum(), 0.0);
    }

    #[test]
    fn test_movement_density_peak_is_one() {
        let moves: Vec<MouseMove> = (0..50).map(|_| mv(960.0, 540.0)).collect();
        let grid = movement_density(&moves, (1920.0, 1080.0), 50, 1.0);

        assert_eq!((grid.rows(), grid.cols()), (49, 49));
        assert!((grid.max() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_movement_density_offscreen_moves_dropped() {
        let grid = movement_density(&[mv(-5.0, 10.0)], (100.0, 100.0), 10, 1.0);
        assert_eq!(grid.max(), 0.0);
    }

    #[test]
    fn test_sample_path_short() {
        let moves: Vec<MouseMove> = (0..100).map(|i| mv(f64::from(i), 0.0)).collect();
        assert!(sample_path(&moves, 100, 1000).is_empty());
    }

    #[test]
    fn test_sample_path_keeps_all_below_max() {
        let moves: Vec<MouseMove> = (0..101).map(|i| mv(f64::from(i), 0.0)).collect();
        let path = sample_path(&moves, 100, 1000);
        assert_eq!(path.len(), 101);
        assert_eq!(path[0], (0.0, 0.0));
    }

    #[test]
    fn test_sample_path_steps() {
        let moves: Vec<MouseMove> = (0..2500).map(|i| mv(f64::from(i), 0.0)).collect();
        let path = sample_path(&moves, 100, 1000);
        // step = 2500 / 1000 = 2
        assert_eq!(path.len(), 1250);
        assert_eq!(path[1], (2.0, 0.0));
    }
}
