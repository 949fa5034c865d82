//! Level banding for filled contour plots.
//!
//! `Levels` splits the value axis into half-open bands `[l_i, l_{i+1})`.
//! Anything below the first level is reported as `Band::Under` so the
//! renderer can paint it with a dedicated colour; the missing-data
//! sentinel lands there on purpose. Values past the last level are left
//! unpainted.

use plotters::style::RGBColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Under,
    Index(usize),
    Over,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Levels {
    pub start: f64,
    pub step: f64,
    pub count: usize,
}

impl Levels {
    /// Same points as `start, start + step, …` strictly below `stop`.
    pub fn arange(start: f64, stop: f64, step: f64) -> Self {
        let count = if step > 0.0 && stop > start {
            ((stop - start) / step).ceil() as usize
        } else {
            0
        };
        Self { start, step, count }
    }

    pub fn values(&self) -> Vec<f64> {
        (0..self.count).map(|i| self.start + i as f64 * self.step).collect()
    }

    pub fn last(&self) -> f64 {
        self.start + self.count.saturating_sub(1) as f64 * self.step
    }

    /// Number of paintable bands between the levels.
    pub fn bands(&self) -> usize {
        self.count.saturating_sub(1)
    }

    pub fn band(&self, value: f64) -> Band {
        if value.is_nan() {
            return Band::Missing;
        }
        if value < self.start {
            return Band::Under;
        }
        let last = self.last();
        if self.bands() == 0 || value > last {
            return Band::Over;
        }
        if value == last {
            return Band::Index(self.bands() - 1);
        }
        let idx = ((value - self.start) / self.step).floor() as usize;
        Band::Index(idx.min(self.bands() - 1))
    }
}

/// Piecewise-linear RGB ramp.
#[derive(Debug, Clone)]
pub struct ColorRamp {
    stops: Vec<RGBColor>,
}

impl ColorRamp {
    pub fn new(stops: Vec<RGBColor>) -> Self {
        Self { stops }
    }

    /// Purple through blue, green and yellow to dark red, in the spirit
    /// of NCL's `gui_default` table.
    pub fn gui_default() -> Self {
        Self::new(vec![
            RGBColor(60, 0, 130),
            RGBColor(40, 60, 200),
            RGBColor(0, 150, 255),
            RGBColor(0, 210, 200),
            RGBColor(0, 190, 60),
            RGBColor(150, 220, 0),
            RGBColor(255, 240, 0),
            RGBColor(255, 150, 0),
            RGBColor(230, 30, 0),
            RGBColor(140, 0, 0),
        ])
    }

    /// Colour at `t` in `[0, 1]`; out-of-range `t` is clamped.
    pub fn sample(&self, t: f64) -> RGBColor {
        match self.stops.len() {
            0 => RGBColor(0, 0, 0),
            1 => self.stops[0],
            n => {
                let pos = t.clamp(0.0, 1.0) * (n - 1) as f64;
                let i = (pos.floor() as usize).min(n - 2);
                let f = pos - i as f64;
                let (a, b) = (self.stops[i], self.stops[i + 1]);
                let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * f).round() as u8;
                RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
            }
        }
    }

    /// One colour per band, spread evenly over the ramp.
    pub fn band_colors(&self, bands: usize) -> Vec<RGBColor> {
        match bands {
            0 => Vec::new(),
            1 => vec![self.sample(0.0)],
            n => (0..n).map(|i| self.sample(i as f64 / (n - 1) as f64)).collect(),
        }
    }
}
