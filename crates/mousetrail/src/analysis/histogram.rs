//! One- and two-dimensional histograms with numpy's binning rules.

use super::Grid;

/// `n` evenly spaced values from `start` to `stop`, both included.
#[must_use]
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Counts of values in equal-width bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges.
    pub edges: Vec<f64>,
    /// Number of values per bin.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Largest bin count.
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Bin `values` into `bins` equal-width bins spanning their range.
///
/// Every bin is half-open except the last, which also holds the maximum.
/// A degenerate range is widened by 0.5 on each side and empty input bins
/// over `(0, 1)`. Non-finite values are skipped.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let bins = bins.max(1);
    let finite = values.iter().copied().filter(|v| v.is_finite());

    let (mut lo, mut hi) = finite
        .clone()
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 1.0));
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let edges = linspace(lo, hi, bins + 1);
    let mut counts = vec![0; bins];
    let width = hi - lo;
    for v in finite {
        let mut idx = ((((v - lo) / width) * bins as f64) as usize).min(bins - 1);
        // The estimate can miss by one where an edge is not exactly representable
        if idx > 0 && v < edges[idx] {
            idx -= 1;
        } else if idx < bins - 1 && v >= edges[idx + 1] {
            idx += 1;
        }
        counts[idx] += 1;
    }

    Histogram { edges, counts }
}

/// Locate `v` among sorted `edges`, numpy style.
///
/// Returns `None` outside `[first, last]`; the last edge belongs to the
/// final bin.
fn bin_index(edges: &[f64], v: f64) -> Option<usize> {
    let bins = edges.len().checked_sub(1)?;
    if bins == 0 || !(v >= edges[0] && v <= edges[bins]) {
        return None;
    }
    let idx = edges.partition_point(|e| *e <= v) - 1;
    Some(idx.min(bins - 1))
}

/// Count points into the cells formed by `x_edges` and `y_edges`.
///
/// The result has one row per y bin and one column per x bin. Points
/// outside the edges are dropped.
#[must_use]
pub fn histogram2d(points: &[(f64, f64)], x_edges: &[f64], y_edges: &[f64]) -> Grid {
    let cols = x_edges.len().saturating_sub(1);
    let rows = y_edges.len().saturating_sub(1);
    let mut grid = Grid::zeros(rows, cols);

    for &(x, y) in points {
        if let (Some(col), Some(row)) = (bin_index(x_edges, x), bin_index(y_edges, y)) {
            *grid.get_mut(row, col) += 1.0;
        }
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_linspace_hits_stop_exactly() {
        let v = linspace(0.0, 1080.0, 50);
        assert_eq!(v.len(), 50);
        assert_eq!(*v.last().unwrap(), 1080.0);
    }

    #[test]
    fn test_histogram_last_bin_closed() {
        let h = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4);
        assert_eq!(h.counts, vec![1, 1, 1, 2]);
        assert_eq!(h.edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(h.total(), 5);
        assert_eq!(h.max_count(), 2);
    }

    #[test]
    fn test_histogram_degenerate_range() {
        let h = histogram(&[2.0, 2.0, 2.0], 2);
        assert_eq!(h.edges, vec![1.5, 2.0, 2.5]);
        assert_eq!(h.counts, vec![0, 3]);
    }

    #[test]
    fn test_histogram_empty() {
        let h = histogram(&[], 3);
        assert_eq!(h.counts, vec![0, 0, 0]);
        assert_eq!(h.edges.first(), Some(&0.0));
        assert_eq!(h.edges.last(), Some(&1.0));
    }

    #[test]
    fn test_histogram_agrees_with_edges() {
        let h = histogram(&[0.0, 0.3, 1.0], 10);
        // edges[3] is 0.30000000000000004, so 0.3 belongs to bin 2
        assert!(h.edges[3] > 0.3);
        assert_eq!(h.counts[2], 1);
        assert_eq!(h.counts[3], 0);
        assert_eq!(h.counts[0], 1);
        assert_eq!(h.counts[9], 1);

        for (i, &v) in [0.1, 0.2, 0.3, 0.6, 0.7].iter().enumerate() {
            let h = histogram(&[0.0, v, 1.0], 10);
            let bin = h.counts.iter().skip(1).take(8).position(|&c| c == 1).map(|b| b + 1);
            let expected = h.edges.partition_point(|e| *e <= v) - 1;
            assert_eq!(bin, Some(expected), "value #{i} ({v}) in wrong bin");
        }
    }

    #[test]
    fn test_histogram_skips_nan() {
        let h = histogram(&[f64::NAN, 1.0, 3.0], 2);
        assert_eq!(h.total(), 2);
    }

    #[test]
    fn test_histogram2d_layout() {
        let edges = [0.0, 10.0, 20.0];
        let grid = histogram2d(&[(1.0, 15.0), (15.0, 1.0), (15.0, 2.0)], &edges, &edges);

        assert_eq!((grid.rows(), grid.cols()), (2, 2));
        assert_eq!(grid.get(1, 0), 1.0);
        assert_eq!(grid.get(0, 1), 2.0);
        assert_eq!(grid.get(0, 0), 0.0);
    }

    #[test]
    fn test_histogram2d_edges() {
        let edges = [0.0, 10.0, 20.0];
        let points = [(20.0, 20.0), (20.1, 5.0), (-0.1, 5.0), (10.0, 0.0)];
        let grid = histogram2d(&points, &edges, &edges);

        // Right-most edge is inclusive, points beyond are dropped
        assert_eq!(grid.get(1, 1), 1.0);
        assert_eq!(grid.get(0, 1), 1.0);
        assert_eq!(grid.sum(), 2.0);
    }

    #[test]
    fn test_bin_index() {
        let edges = [0.0, 1.0, 2.0];
        assert_eq!(bin_index(&edges, 0.0), Some(0));
        assert_eq!(bin_index(&edges, 1.0), Some(1));
        assert_eq!(bin_index(&edges, 2.0), Some(1));
        assert_eq!(bin_index(&edges, 2.5), None);
        assert_eq!(bin_index(&edges, f64::NAN), None);
        assert_eq!(bin_index(&[1.0], 1.0), None);
    }
}
