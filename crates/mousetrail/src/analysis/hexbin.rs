//! Hexagonal binning on two interleaved rectangular lattices.
//!
//! Hexagon centres lie on lattice 1 at `(i * sx, j * sy)` and on lattice 2
//! offset by half a cell in both directions. Each point goes to whichever
//! nearby centre is closer in the hexagonal metric.

/// Rectangular data bounds `(xmin, xmax, ymin, ymax)`.
pub type Extent = (f64, f64, f64, f64);

/// One non-empty hexagon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexBin {
    /// Centre x.
    pub x: f64,
    /// Centre y.
    pub y: f64,
    /// Number of points in the hexagon.
    pub count: usize,
}

/// Result of [`hexbin`].
#[derive(Debug, Clone, PartialEq)]
pub struct HexGrid {
    /// Horizontal lattice spacing.
    pub sx: f64,
    /// Vertical lattice spacing.
    pub sy: f64,
    /// Non-empty hexagons.
    pub bins: Vec<HexBin>,
}

impl HexGrid {
    /// Corners of the hexagon centred at `(cx, cy)`.
    #[must_use]
    pub fn vertices(&self, cx: f64, cy: f64) -> [(f64, f64); 6] {
        const UNIT: [(f64, f64); 6] = [
            (0.5, -0.5),
            (0.5, 0.5),
            (0.0, 1.0),
            (-0.5, 0.5),
            (-0.5, -0.5),
            (0.0, -1.0),
        ];
        let h = self.sy / 3.0;
        UNIT.map(|(ux, uy)| (cx + ux * self.sx, cy + uy * h))
    }

    /// Largest hexagon count.
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

/// Widen a zero-width interval so it can be divided into cells.
#[allow(clippy::float_cmp)]
fn nonsingular(lo: f64, hi: f64) -> (f64, f64) {
    const EXPANDER: f64 = 0.1;
    if lo != hi {
        return (lo, hi);
    }
    if lo == 0.0 {
        (-EXPANDER, EXPANDER)
    } else {
        (lo - EXPANDER * lo.abs(), hi + EXPANDER * hi.abs())
    }
}

fn bounds(points: &[(f64, f64)]) -> Extent {
    points.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(x0, x1, y0, y1), &(x, y)| (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
    )
}

/// Bin points into hexagons, `gridsize` across.
///
/// The extent defaults to the bounds of the data. Empty hexagons are
/// omitted.
#[must_use]
pub fn hexbin(points: &[(f64, f64)], gridsize: usize, extent: Option<Extent>) -> HexGrid {
    let points: Vec<(f64, f64)> = points
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    let nx = gridsize.max(1);
    let ny = ((nx as f64 / 3f64.sqrt()) as usize).max(1);

    let (xmin, xmax, ymin, ymax) = match extent {
        Some(e) => e,
        None if points.is_empty() => (0.0, 0.0, 0.0, 0.0),
        None => bounds(&points),
    };
    let (xmin, xmax) = nonsingular(xmin, xmax);
    let (ymin, ymax) = nonsingular(ymin, ymax);

    let padding = 1e-9 * (xmax - xmin);
    let (xmin, xmax) = (xmin - padding, xmax + padding);
    let sx = (xmax - xmin) / nx as f64;
    let sy = (ymax - ymin) / ny as f64;

    let (nx1, ny1) = (nx + 1, ny + 1);
    let mut lattice1 = vec![0usize; nx1 * ny1];
    let mut lattice2 = vec![0usize; nx * ny];

    for (x, y) in points {
        let ix = (x - xmin) / sx;
        let iy = (y - ymin) / sy;
        let (ix1, iy1) = (ix.round_ties_even(), iy.round_ties_even());
        let (ix2, iy2) = (ix.floor(), iy.floor());

        let d1 = (ix - ix1).powi(2) + 3.0 * (iy - iy1).powi(2);
        let d2 = (ix - ix2 - 0.5).powi(2) + 3.0 * (iy - iy2 - 0.5).powi(2);

        if d1 < d2 {
            if (0.0..nx1 as f64).contains(&ix1) && (0.0..ny1 as f64).contains(&iy1) {
                lattice1[ix1 as usize * ny1 + iy1 as usize] += 1;
            }
        } else if (0.0..nx as f64).contains(&ix2) && (0.0..ny as f64).contains(&iy2) {
            lattice2[ix2 as usize * ny + iy2 as usize] += 1;
        }
    }

    let mut bins = Vec::new();
    for (i, &count) in lattice1.iter().enumerate() {
        if count > 0 {
            let (col, row) = (i / ny1, i % ny1);
            bins.push(HexBin {
                x: xmin + col as f64 * sx,
                y: ymin + row as f64 * sy,
                count,
            });
        }
    }
    for (i, &count) in lattice2.iter().enumerate() {
        if count > 0 {
            let (col, row) = (i / ny, i % ny);
            bins.push(HexBin {
                x: xmin + (col as f64 + 0.5) * sx,
                y: ymin + (row as f64 + 0.5) * sy,
                count,
            });
        }
    }

    HexGrid { sx, sy, bins }
}
