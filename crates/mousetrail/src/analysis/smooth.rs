//! Gaussian smoothing and bilinear resampling of grids.

use super::Grid;

/// Kernel extent in standard deviations.
const TRUNCATE: f64 = 4.0;

/// Upper bound on the kernel radius, in cells.
const MAX_RADIUS: usize = 4096;

fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = ((TRUNCATE * sigma + 0.5) as usize).min(MAX_RADIUS);
    let mut weights: Vec<f64> = (0..=2 * radius)
        .map(|i| {
            let k = i as f64 - radius as f64;
            (-0.5 * k * k / (sigma * sigma)).exp()
        })
        .collect();
    let total: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }
    weights
}

/// Mirror an out-of-range index back into `0..n`, repeating the edge
/// sample (`d c b a | a b c d | d c b a`).
fn reflect(i: isize, n: usize) -> usize {
    let n = n as isize;
    let m = i.rem_euclid(2 * n);
    (if m < n { m } else { 2 * n - 1 - m }) as usize
}

fn convolve(line: &[f64], kernel: &[f64], out: &mut [f64]) {
    let radius = (kernel.len() / 2) as isize;
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = kernel
            .iter()
            .enumerate()
            .map(|(k, w)| w * line[reflect(i as isize + k as isize - radius, line.len())])
            .sum();
    }
}

/// Smooth a grid with a separable Gaussian of standard deviation `sigma`.
///
/// The kernel is truncated at four standard deviations and edges use
/// reflect mode. A non-positive `sigma` returns the grid unchanged.
#[must_use]
pub fn gaussian_filter(grid: &Grid, sigma: f64) -> Grid {
    if sigma <= 0.0 || grid.is_empty() {
        return grid.clone();
    }
    let kernel = gaussian_kernel(sigma);
    let (rows, cols) = (grid.rows(), grid.cols());

    let mut horizontal = Grid::zeros(rows, cols);
    let mut out_row = vec![0.0; cols];
    for r in 0..rows {
        convolve(grid.row(r), &kernel, &mut out_row);
        horizontal.row_mut(r).copy_from_slice(&out_row);
    }

    let mut result = Grid::zeros(rows, cols);
    let mut column = vec![0.0; rows];
    let mut out_col = vec![0.0; rows];
    for c in 0..cols {
        for (r, slot) in column.iter_mut().enumerate() {
            *slot = horizontal.get(r, c);
        }
        convolve(&column, &kernel, &mut out_col);
        for (r, v) in out_col.iter().enumerate() {
            *result.get_mut(r, c) = *v;
        }
    }

    result
}

/// Sample a grid at pixel `(px, py)` of a `width x height` image covering it.
///
/// Cell values sit at cell centres; pixels beyond the outermost centres
/// take the edge value.
#[must_use]
pub fn bilinear_sample(grid: &Grid, px: u32, py: u32, width: u32, height: u32) -> f64 {
    if grid.is_empty() || width == 0 || height == 0 {
        return 0.0;
    }
    let coord = |p: u32, extent: u32, cells: usize| -> (usize, usize, f64) {
        let u = (f64::from(p) + 0.5) / f64::from(extent) * cells as f64 - 0.5;
        let u = u.clamp(0.0, (cells - 1) as f64);
        let lo = u.floor() as usize;
        let hi = (lo + 1).min(cells - 1);
        (lo, hi, u - lo as f64)
    };

    let (c0, c1, fx) = coord(px, width, grid.cols());
    let (r0, r1, fy) = coord(py, height, grid.rows());

    let top = grid.get(r0, c0) * (1.0 - fx) + grid.get(r0, c1) * fx;
    let bottom = grid.get(r1, c0) * (1.0 - fx) + grid.get(r1, c1) * fx;
    top * (1.0 - fy) + bottom * fy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_normalized_and_sized() {
        let kernel = gaussian_kernel(1.0);
        assert_eq!(kernel.len(), 9);
        assert!((kernel.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(kernel[4] > kernel[3]);
    }

    #[test]
    fn test_reflect() {
        assert_eq!(reflect(-1, 4), 0);
        assert_eq!(reflect(-2, 4), 1);
        assert_eq!(reflect(4, 4), 3);
        assert_eq!(reflect(5, 4), 2);
        assert_eq!(reflect(2, 4), 2);
        assert_eq!(reflect(-5, 1), 0);
    }

    #[test]
    fn test_filter_preserves_mass() {
        let mut grid = Grid::zeros(9, 9);
        *grid.get_mut(4, 4) = 1.0;
        let smoothed = gaussian_filter(&grid, 1.0);

        // Reflect mode keeps everything inside the grid
        assert!((smoothed.sum() - 1.0).abs() < 1e-9);
        assert!(smoothed.get(4, 4) < 1.0);
        assert!(smoothed.get(4, 5) > 0.0);
        assert!((smoothed.get(4, 3) - smoothed.get(4, 5)).abs() < 1e-12);
        assert!((smoothed.get(3, 4) - smoothed.get(4, 3)).abs() < 1e-12);
    }

    #[test]
    fn test_filter_corner_impulse_matches_scipy() {
        // scipy.ndimage.gaussian_filter1d(np.eye(1, 9)[0], 1.0), mode="reflect"
        let expected = [
            0.640_914_915_012_698_5,
            0.295_962_573_077_305_1,
            0.058_422_989_040_735_67,
            0.004_565_692_244_646_007,
            0.000_133_830_624_614_741_75,
            0.0,
            0.0,
            0.0,
            0.0,
        ];
        let mut grid = Grid::zeros(9, 9);
        *grid.get_mut(0, 0) = 1.0;
        let smoothed = gaussian_filter(&grid, 1.0);

        for (c, want) in expected.iter().enumerate() {
            assert!(
                (smoothed.get(0, c) - expected[0] * want).abs() < 1e-12,
                "column {c}"
            );
        }
        assert!((smoothed.get(2, 1) - expected[2] * expected[1]).abs() < 1e-12);
        // Beyond four sigma the kernel is truncated to exact zeros
        assert!(smoothed.get(0, 5).abs() < f64::EPSILON);
        assert!(smoothed.get(8, 8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kernel_radius_bounded() {
        assert_eq!(gaussian_kernel(1e17).len(), 2 * MAX_RADIUS + 1);

        let mut grid = Grid::zeros(4, 4);
        *grid.get_mut(1, 1) = 16.0;
        let smoothed = gaussian_filter(&grid, 1e17);
        assert!((smoothed.sum() - 16.0).abs() < 1e-6);
        assert!((smoothed.get(3, 3) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_filter_constant_grid_unchanged() {
        let mut grid = Grid::zeros(5, 7);
        for r in 0..5 {
            grid.row_mut(r).fill(2.0);
        }
        let smoothed = gaussian_filter(&grid, 2.0);
        for r in 0..5 {
            for c in 0..7 {
                assert!((smoothed.get(r, c) - 2.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_filter_zero_sigma_is_identity() {
        let mut grid = Grid::zeros(3, 3);
        *grid.get_mut(0, 2) = 5.0;
        assert_eq!(gaussian_filter(&grid, 0.0), grid);
    }

    #[test]
    fn test_bilinear_corners_and_middle() {
        let mut grid = Grid::zeros(2, 2);
        *grid.get_mut(0, 1) = 1.0;
        *grid.get_mut(1, 1) = 1.0;

        assert!(bilinear_sample(&grid, 0, 0, 4, 4).abs() < 1e-12);
        assert!((bilinear_sample(&grid, 3, 0, 4, 4) - 1.0).abs() < 1e-12);
        // Halfway between the two columns
        let mid = bilinear_sample(&grid, 4, 0, 9, 9);
        assert!((mid - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_bilinear_empty_grid() {
        assert!(bilinear_sample(&Grid::zeros(0, 0), 0, 0, 10, 10).abs() < f64::EPSILON);
    }
}
