use crate::{Error, Result};

/// Every `step`-th element starting at `start`; no interpolation.
pub fn stride<T: Copy>(input: &[T], step: usize, start: usize) -> Result<Vec<T>> {
    if step == 0 {
        return Err(Error::InvalidStride);
    }
    Ok(input.iter().skip(start).step_by(step).copied().collect())
}

/// Smallest value, ignoring NaN. `None` when nothing finite is left.
pub fn nan_min(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.min(v))))
}

pub fn is_non_decreasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

/// Step outline of a centred bar series.
///
/// Half the spacing of the first two bars is used as the half-width. The
/// path starts and ends on `y = 0` and has two vertices per bar.
pub fn bar_outline(xs: &[f64], ys: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return (Vec::new(), Vec::new());
    }
    let half = if n > 1 { (xs[1] - xs[0]) / 2.0 } else { 0.5 };

    let mut ox = Vec::with_capacity(2 * n + 2);
    let mut oy = Vec::with_capacity(2 * n + 2);
    ox.push(xs[0] - half);
    oy.push(0.0);
    for (&x, &y) in xs.iter().zip(ys).take(n) {
        ox.push(x - half);
        ox.push(x + half);
        oy.push(y);
        oy.push(y);
    }
    ox.push(xs[n - 1] + half);
    oy.push(0.0);
    (ox, oy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_length_is_ceiling() {
        let input: Vec<i32> = (0..17).collect();
        for s in 1..=20 {
            let out = stride(&input, s, 0).unwrap();
            assert_eq!(out.len(), (input.len() + s - 1) / s, "stride {s}");
            for (i, v) in out.iter().enumerate() {
                assert_eq!(*v, input[i * s]);
            }
        }
    }

    #[test]
    fn stride_with_offset() {
        let out = stride(&[10, 11, 12, 13, 14, 15, 16], 3, 1).unwrap();
        assert_eq!(out, vec![11, 14]);
        assert!(stride(&[1, 2], 2, 5).unwrap().is_empty());
    }

    #[test]
    fn zero_stride_is_rejected() {
        assert!(matches!(stride(&[1.0, 2.0], 0, 0), Err(Error::InvalidStride)));
    }

    #[test]
    fn nan_min_skips_missing() {
        assert_eq!(nan_min(&[f64::NAN, 2.0, -1.5, f64::NAN, 4.0]), Some(-1.5));
        assert_eq!(nan_min(&[f64::NAN]), None);
        assert_eq!(nan_min(&[]), None);
    }

    #[test]
    fn monotonic_check() {
        assert!(is_non_decreasing(&[1.0, 1.0, 2.0]));
        assert!(!is_non_decreasing(&[1.0, 0.5]));
        assert!(is_non_decreasing(&[]));
    }

    #[test]
    fn outline_brackets_every_bar() {
        let (ox, oy) = bar_outline(&[1.0, 2.0, 3.0], &[0.5, -1.0, 2.0]);
        assert_eq!(ox, vec![0.5, 0.5, 1.5, 1.5, 2.5, 2.5, 3.5, 3.5]);
        assert_eq!(oy, vec![0.0, 0.5, 0.5, -1.0, -1.0, 2.0, 2.0, 0.0]);
    }

    #[test]
    fn outline_of_nothing_is_empty() {
        let (ox, oy) = bar_outline(&[], &[]);
        assert!(ox.is_empty() && oy.is_empty());
    }
}
