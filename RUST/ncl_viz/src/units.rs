use std::ops::Range;

/// Element-wise `(x + offset) * scale + shift`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMap {
    pub offset: f64,
    pub scale: f64,
    pub shift: f64,
}

impl AffineMap {
    pub const IDENTITY: AffineMap = AffineMap { offset: 0.0, scale: 1.0, shift: 0.0 };

    pub fn scale(k: f64) -> Self {
        Self { scale: k, ..Self::IDENTITY }
    }

    pub fn kelvin_to_fahrenheit() -> Self {
        Self { offset: -273.15, scale: 9.0 / 5.0, shift: 32.0 }
    }

    /// Grid index `0..=n` onto longitude `0..=360`.
    pub fn index_to_longitude(n: usize) -> Self {
        Self::scale(360.0 / n as f64)
    }

    /// Maps `from` linearly onto `to`; used to draw a twin axis in the
    /// coordinates of its host chart.
    pub fn between(from: Range<f64>, to: Range<f64>) -> Self {
        Self {
            offset: -from.start,
            scale: (to.end - to.start) / (from.end - from.start),
            shift: to.start,
        }
    }

    pub fn apply(&self, x: f64) -> f64 {
        (x + self.offset) * self.scale + self.shift
    }

    pub fn apply_all(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.apply(x)).collect()
    }
}
