use rayon::prelude::*;

use crate::{Error, Grid2, Result};

// ─────────────────────────────────────────────────────────────────────
// Scan geometry
// ─────────────────────────────────────────────────────────────────────

/// Range spacing and wraparound window of one radar sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanGeometry {
    /// Distance between consecutive range bins (km).
    pub cell_size: f64,
    /// Number of leading azimuth samples that may sit on the far side of
    /// the 0°/360° crossing.
    pub wrap_prefix: usize,
}

impl Default for ScanGeometry {
    fn default() -> Self {
        Self { cell_size: 0.25, wrap_prefix: 63 }
    }
}

impl ScanGeometry {
    pub fn ranges(&self, bins: usize) -> Vec<f64> {
        range_bins(bins, self.cell_size)
    }
}

/// `r[i] = i * cell_size` for `i in 0..count`.
pub fn range_bins(count: usize, cell_size: f64) -> Vec<f64> {
    (0..count).map(|i| i as f64 * cell_size).collect()
}

// ─────────────────────────────────────────────────────────────────────
// Azimuth fix-up
// ─────────────────────────────────────────────────────────────────────

/// Returns a copy of `azimuth` with the leading wrap window unrolled.
///
/// Samples among the first `wrap_prefix` that are larger than the first
/// sample after the window are moved down by 360°. A sample already
/// unrolled is below that reference, so feeding the output back in gives
/// the same sequence.
pub fn normalize_azimuth(azimuth: &[f64], wrap_prefix: usize) -> Result<Vec<f64>> {
    if wrap_prefix == 0 {
        return Ok(azimuth.to_vec());
    }
    if wrap_prefix >= azimuth.len() {
        return Err(Error::InvalidWrapPrefix { prefix: wrap_prefix, len: azimuth.len() });
    }

    let reference = azimuth[wrap_prefix];
    Ok(azimuth
        .iter()
        .enumerate()
        .map(|(i, &a)| if i < wrap_prefix && a > reference { a - 360.0 } else { a })
        .collect())
}

// ─────────────────────────────────────────────────────────────────────
// Projection
// ─────────────────────────────────────────────────────────────────────

/// Cartesian coordinates of every (azimuth, range) node; shape A × R.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarGrid {
    pub x: Grid2,
    pub y: Grid2,
}

impl PolarGrid {
    pub fn shape(&self) -> (usize, usize) { self.x.shape() }
}

/// Meshes `ranges` against `azimuth_deg` and projects each node:
/// `X = r cos θ`, `Y = r sin θ`.
pub fn project_polar(ranges: &[f64], azimuth_deg: &[f64]) -> PolarGrid {
    let cols = ranges.len();
    let rows = azimuth_deg.len();
    let mut x = vec![0.0; rows * cols];
    let mut y = vec![0.0; rows * cols];

    if cols > 0 {
        x.par_chunks_mut(cols)
            .zip(y.par_chunks_mut(cols))
            .zip(azimuth_deg.par_iter())
            .for_each(|((xrow, yrow), &theta)| {
                let (sin, cos) = theta.to_radians().sin_cos();
                for ((xv, yv), &r) in xrow.iter_mut().zip(yrow.iter_mut()).zip(ranges) {
                    *xv = r * cos;
                    *yv = r * sin;
                }
            });
    }

    PolarGrid {
        x: Grid2::from_raw(rows, cols, x),
        y: Grid2::from_raw(rows, cols, y),
    }
}

/// NaN → `sentinel`; other values pass through untouched.
pub fn replace_nan(values: &[f64], sentinel: f64) -> Vec<f64> {
    values
        .par_iter()
        .map(|&v| if v.is_nan() { sentinel } else { v })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrapped_sweep() -> Vec<f64> {
        // 63 samples before north, then the rest of the turn
        (0..64).map(|i| (360.0 - 31.5 + i as f64 * 0.5).rem_euclid(360.0)).collect()
    }

    #[test]
    fn range_bins_are_evenly_spaced_from_zero() {
        assert_eq!(range_bins(4, 0.25), vec![0.0, 0.25, 0.5, 0.75]);
        assert!(range_bins(0, 0.25).is_empty());
    }

    #[test]
    fn unrolls_leading_window() {
        let out = normalize_azimuth(&[358.0, 359.0, 359.5, 0.5, 1.5, 2.5], 3).unwrap();
        assert_eq!(out, vec![-2.0, -1.0, -0.5, 0.5, 1.5, 2.5]);
    }

    #[test]
    fn normalized_sweep_is_monotonic_and_stable() {
        let raw = wrapped_sweep();
        assert!(!crate::is_non_decreasing(&raw));

        let once = normalize_azimuth(&raw, 63).unwrap();
        assert!(crate::is_non_decreasing(&once));

        let twice = normalize_azimuth(&once, 63).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn zero_window_is_identity() {
        let raw = wrapped_sweep();
        assert_eq!(normalize_azimuth(&raw, 0).unwrap(), raw);
    }

    #[test]
    fn window_must_leave_a_reference() {
        let err = normalize_azimuth(&[1.0, 2.0], 2).unwrap_err();
        assert!(matches!(err, Error::InvalidWrapPrefix { prefix: 2, len: 2 }));
    }

    #[test]
    fn projection_recovers_radius_and_angle() {
        let ranges = range_bins(5, 0.25);
        let azimuth = normalize_azimuth(&[350.0, 355.0, 0.0, 45.0, 90.0, 200.0], 2).unwrap();
        let grid = project_polar(&ranges, &azimuth);
        assert_eq!(grid.shape(), (6, 5));

        for (a, &theta) in azimuth.iter().enumerate() {
            for (r, &radius) in ranges.iter().enumerate() {
                let x = grid.x.get(a, r).unwrap();
                let y = grid.y.get(a, r).unwrap();
                assert!((x.hypot(y) - radius).abs() < 1e-9);
                if radius > 0.0 {
                    let back = y.atan2(x).to_degrees().rem_euclid(360.0);
                    let diff = (back - theta.rem_euclid(360.0)).abs();
                    assert!(diff < 1e-9 || (360.0 - diff) < 1e-9, "θ={theta} got {back}");
                }
            }
        }
    }

    #[test]
    fn quarter_turn_points_up() {
        let grid = project_polar(&[0.0, 2.0], &[90.0]);
        assert!(grid.x.get(0, 1).unwrap().abs() < 1e-12);
        assert!((grid.y.get(0, 1).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn sentinel_substitution_keeps_other_values() {
        let input = [3.5, f64::NAN, -20.0, f64::NAN];
        let out = replace_nan(&input, -1.0e8);
        assert_eq!(out, vec![3.5, -1.0e8, -20.0, -1.0e8]);
    }
}
