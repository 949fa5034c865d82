//! Axis, tick, title and colorbar drawing on top of plotters.
//!
//! plotters picks its own tick positions; the NCL figures want explicit
//! major ticks, a fixed number of minor ticks between them, inward tick
//! marks and titles pinned to the left and right of the plot. Everything
//! here draws on the root area in backend pixels, using a `Frame` that
//! records where a chart's plotting area ended up.

use std::ops::Range;

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::levels::Levels;

pub type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

// ─────────────────────────────────────────────────────────────────────
// Tick values
// ─────────────────────────────────────────────────────────────────────

/// `start, start + step, …` strictly below `stop`.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || stop <= start {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil() as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// `n` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => (0..n)
            .map(|i| start + (stop - start) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// Roughly `target` ticks on 1-2-5 multiples of a power of ten.
pub fn nice_ticks(range: &Range<f64>, target: usize) -> Vec<f64> {
    let lo = range.start.min(range.end);
    let hi = range.start.max(range.end);
    let span = hi - lo;
    if !(span > 0.0) || !span.is_finite() || target == 0 {
        return Vec::new();
    }
    let raw = span / target as f64;
    let mag = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * mag)
        .find(|s| *s >= raw * (1.0 - 1e-9))
        .unwrap_or(10.0 * mag);
    let first = (lo / step).ceil() * step;
    let n = ((hi - first) / step + 1e-9).floor() as usize + 1;
    (0..n).map(|i| first + i as f64 * step).collect()
}

/// Smallest range holding every finite value, padded by 5 % each side.
/// Falls back to `-2..2` when nothing finite is given.
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return -2.0..2.0;
    }
    let pad = ((hi - lo) * 0.05).max(0.1);
    (lo - pad)..(hi + pad)
}

/// Tick label text: integers without a decimal point, otherwise the
/// shortest form up to six decimals.
pub fn tick_label(v: f64) -> String {
    let rounded = (v * 1e6).round() / 1e6 + 0.0;
    format!("{rounded}")
}

/// Value range of one axis plus its tick layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub range: Range<f64>,
    pub major: Vec<f64>,
    pub minor_per_major: usize,
}

impl Axis {
    pub fn new(range: Range<f64>) -> Self {
        Self { range, major: Vec::new(), minor_per_major: 1 }
    }

    pub fn ticks(mut self, major: Vec<f64>) -> Self {
        self.major = major;
        self
    }

    pub fn minor(mut self, per_major: usize) -> Self {
        self.minor_per_major = per_major.max(1);
        self
    }

    fn contains(&self, v: f64) -> bool {
        let (lo, hi) = (self.range.start.min(self.range.end), self.range.start.max(self.range.end));
        v >= lo - 1e-9 && v <= hi + 1e-9
    }

    pub fn visible_major(&self) -> Vec<f64> {
        self.major.iter().copied().filter(|&v| self.contains(v)).collect()
    }

    /// Minor ticks between and around the majors, clipped to the range.
    pub fn minor_ticks(&self) -> Vec<f64> {
        if self.major.len() < 2 || self.minor_per_major < 2 {
            return Vec::new();
        }
        let step = (self.major[1] - self.major[0]) / self.minor_per_major as f64;
        if step <= 0.0 {
            return Vec::new();
        }
        let lo = self.range.start.min(self.range.end);
        let hi = self.range.start.max(self.range.end);
        let first = self.major[0] - ((self.major[0] - lo) / step).floor() * step;

        let mut out = Vec::new();
        let mut k = 0;
        loop {
            let v = first + k as f64 * step;
            if v > hi + 1e-9 {
                break;
            }
            let on_major = ((v - self.major[0]) / step).round() as i64 % self.minor_per_major as i64 == 0;
            if !on_major {
                out.push(v);
            }
            k += 1;
        }
        out
    }
}

// ─────────────────────────────────────────────────────────────────────
// Frame: data → pixel mapping of one plotting area
// ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Frame {
    pub px: Range<i32>,
    pub py: Range<i32>,
    pub x: Axis,
    pub y: Axis,
}

impl Frame {
    pub fn new(px: Range<i32>, py: Range<i32>, x: Axis, y: Axis) -> Self {
        Self { px, py, x, y }
    }

    /// Frame of an already built cartesian chart.
    pub fn of_chart<DB: DrawingBackend>(
        chart: &ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        x: Axis,
        y: Axis,
    ) -> Self {
        let (px, py) = chart.plotting_area().get_pixel_range();
        Self { px, py, x, y }
    }

    /// Same pixel box, different y axis (twin axes).
    pub fn with_y(&self, y: Axis) -> Self {
        Self { y, ..self.clone() }
    }

    pub fn x_px(&self, v: f64) -> i32 {
        let Range { start, end } = self.x.range;
        let t = (v - start) / (end - start);
        self.px.start + (t * (self.px.end - self.px.start) as f64).round() as i32
    }

    pub fn y_px(&self, v: f64) -> i32 {
        let Range { start, end } = self.y.range;
        let t = (v - start) / (end - start);
        self.py.end - (t * (self.py.end - self.py.start) as f64).round() as i32
    }

    pub fn width(&self) -> i32 { self.px.end - self.px.start }
}

// ─────────────────────────────────────────────────────────────────────
// Drawing
// ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Bottom,
    Top,
}

#[derive(Debug, Clone)]
pub struct TickStyle {
    pub major_len: i32,
    pub minor_len: i32,
    pub font_size: f64,
    pub labels: bool,
    pub color: RGBColor,
}

impl Default for TickStyle {
    fn default() -> Self {
        Self { major_len: 8, minor_len: 4, font_size: 14.0, labels: true, color: BLACK }
    }
}

impl TickStyle {
    pub fn font(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn no_labels(mut self) -> Self {
        self.labels = false;
        self
    }
}

fn line<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    a: (i32, i32),
    b: (i32, i32),
    color: &RGBColor,
) -> DrawResult<DB> {
    root.draw(&PathElement::new(vec![a, b], color.stroke_width(1)))
}

/// Black rectangle around the plotting area.
pub fn draw_border<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, frame: &Frame) -> DrawResult<DB> {
    root.draw(&Rectangle::new(
        [(frame.px.start, frame.py.start), (frame.px.end, frame.py.end)],
        BLACK.stroke_width(1),
    ))
}

/// Inward ticks on one side of the frame; `offset` moves the spine
/// outward and draws it.
pub fn draw_axis<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    frame: &Frame,
    side: Side,
    offset: i32,
    style: &TickStyle,
) -> DrawResult<DB> {
    let font = ("sans-serif", style.font_size).into_font().color(&style.color);
    let (axis, horizontal) = match side {
        Side::Bottom | Side::Top => (&frame.x, true),
        Side::Left | Side::Right => (&frame.y, false),
    };
    // spine position and the direction that points into the plot
    let (spine, inward) = match side {
        Side::Bottom => (frame.py.end + offset, -1),
        Side::Top => (frame.py.start - offset, 1),
        Side::Left => (frame.px.start - offset, 1),
        Side::Right => (frame.px.end + offset, -1),
    };

    if offset != 0 {
        if horizontal {
            line(root, (frame.px.start, spine), (frame.px.end, spine), &style.color)?;
        } else {
            line(root, (spine, frame.py.start), (spine, frame.py.end), &style.color)?;
        }
    }

    let pos = |v: f64| if horizontal { frame.x_px(v) } else { frame.y_px(v) };
    for v in axis.minor_ticks() {
        let p = pos(v);
        let tip = spine + inward * style.minor_len;
        if horizontal {
            line(root, (p, spine), (p, tip), &style.color)?;
        } else {
            line(root, (spine, p), (tip, p), &style.color)?;
        }
    }
    for v in axis.visible_major() {
        let p = pos(v);
        let tip = spine + inward * style.major_len;
        if horizontal {
            line(root, (p, spine), (p, tip), &style.color)?;
        } else {
            line(root, (spine, p), (tip, p), &style.color)?;
        }
        if !style.labels {
            continue;
        }
        let gap = 6 * -inward;
        let (anchor, at) = match side {
            Side::Bottom => (Pos::new(HPos::Center, VPos::Top), (p, spine + gap)),
            Side::Top => (Pos::new(HPos::Center, VPos::Bottom), (p, spine + gap)),
            Side::Left => (Pos::new(HPos::Right, VPos::Center), (spine + gap, p)),
            Side::Right => (Pos::new(HPos::Left, VPos::Center), (spine + gap, p)),
        };
        root.draw(&Text::new(tick_label(v), at, font.clone().pos(anchor)))?;
    }
    Ok(())
}

/// Axis description text centred along one side, `distance` pixels out.
pub fn draw_axis_label<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    frame: &Frame,
    side: Side,
    distance: i32,
    text: &str,
    size: f64,
) -> DrawResult<DB> {
    if text.is_empty() {
        return Ok(());
    }
    let mid_x = (frame.px.start + frame.px.end) / 2;
    let mid_y = (frame.py.start + frame.py.end) / 2;
    let font = ("sans-serif", size).into_font().color(&BLACK);
    let (anchor, at) = match side {
        Side::Bottom => (Pos::new(HPos::Center, VPos::Top), (mid_x, frame.py.end + distance)),
        Side::Top => (Pos::new(HPos::Center, VPos::Bottom), (mid_x, frame.py.start - distance)),
        Side::Left => (Pos::new(HPos::Right, VPos::Center), (frame.px.start - distance, mid_y)),
        Side::Right => (Pos::new(HPos::Left, VPos::Center), (frame.px.end + distance, mid_y)),
    };
    root.draw(&Text::new(text.to_string(), at, font.pos(anchor)))
}

/// Main title centred above the plot, side titles flush with its edges.
pub fn draw_titles<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    frame: &Frame,
    main: Option<(&str, f64)>,
    left: Option<(&str, f64)>,
    right: Option<(&str, f64)>,
) -> DrawResult<DB> {
    let y = frame.py.start - 6;
    let place = [
        (main, Pos::new(HPos::Center, VPos::Bottom), (frame.px.start + frame.px.end) / 2),
        (left, Pos::new(HPos::Left, VPos::Bottom), frame.px.start),
        (right, Pos::new(HPos::Right, VPos::Bottom), frame.px.end),
    ];
    for (title, anchor, x) in place {
        if let Some((text, size)) = title {
            let font = ("sans-serif", size).into_font().color(&BLACK).pos(anchor);
            root.draw(&Text::new(text.to_string(), (x, y), font))?;
        }
    }
    Ok(())
}

/// Horizontal colorbar inside `px × py` with a triangular under-colour
/// extension on the left and one cell per band.
pub fn draw_colorbar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    px: Range<i32>,
    py: Range<i32>,
    levels: &Levels,
    colors: &[RGBColor],
    under: &RGBColor,
    ticks: &[f64],
    font_size: f64,
) -> DrawResult<DB> {
    let bands = levels.bands().min(colors.len());
    if bands == 0 {
        return Ok(());
    }
    let height = py.end - py.start;
    let tip = px.start;
    let left = px.start + height;
    let cell = (px.end - left) as f64 / bands as f64;
    let edge = |i: usize| left + (i as f64 * cell).round() as i32;

    root.draw(&Polygon::new(
        vec![(tip, (py.start + py.end) / 2), (left, py.start), (left, py.end)],
        under.filled(),
    ))?;
    root.draw(&PathElement::new(
        vec![(left, py.start), (tip, (py.start + py.end) / 2), (left, py.end)],
        BLACK.stroke_width(1),
    ))?;
    for (i, color) in colors.iter().take(bands).enumerate() {
        root.draw(&Rectangle::new([(edge(i), py.start), (edge(i + 1), py.end)], color.filled()))?;
        root.draw(&Rectangle::new([(edge(i), py.start), (edge(i + 1), py.end)], BLACK.stroke_width(1)))?;
    }

    let span = levels.last() - levels.start;
    let font = ("sans-serif", font_size)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for &t in ticks {
        if span <= 0.0 || t < levels.start || t > levels.last() {
            continue;
        }
        let x = left + (((t - levels.start) / span) * (px.end - left) as f64).round() as i32;
        line(root, (x, py.end), (x, py.end + 4), &BLACK)?;
        root.draw(&Text::new(tick_label(t), (x, py.end + 6), font.clone()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arange_excludes_stop() {
        assert_eq!(arange(-2.0, 2.0, 0.5), vec![-2.0, -1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5]);
        assert!(arange(1.0, 1.0, 0.5).is_empty());
    }

    #[test]
    fn linspace_includes_both_ends() {
        assert_eq!(linspace(1900.0, 1980.0, 5), vec![1900.0, 1920.0, 1940.0, 1960.0, 1980.0]);
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    }

    #[test]
    fn nice_ticks_pick_round_steps() {
        assert_eq!(nice_ticks(&(10.0..60.0), 5), vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
        let t = nice_ticks(&(-3512.0..-2890.0), 7);
        assert_eq!(t.first(), Some(&-3500.0));
        assert_eq!(t.last(), Some(&-2900.0));
        assert!(nice_ticks(&(1.0..1.0), 5).is_empty());
    }

    #[test]
    fn padded_range_covers_values() {
        let r = padded_range([-1.0, 3.0, f64::NAN]);
        assert!(r.start < -1.0 && r.end > 3.0);
        assert_eq!(padded_range([f64::NAN]), -2.0..2.0);
    }

    #[test]
    fn labels_drop_trailing_zeros() {
        assert_eq!(tick_label(1900.0), "1900");
        assert_eq!(tick_label(-1.5), "-1.5");
        assert_eq!(tick_label(-0.0), "0");
        assert_eq!(tick_label(0.1 + 0.2), "0.3");
    }

    #[test]
    fn minor_ticks_fill_between_and_beyond_majors() {
        let axis = Axis::new(-240.0..240.0)
            .ticks(vec![-200.0, -100.0, 0.0, 100.0, 200.0])
            .minor(5);
        let minor = axis.minor_ticks();
        assert!((minor[0] - (-240.0)).abs() < 1e-9);
        assert!(!minor.iter().any(|v| (v % 100.0).abs() < 1e-9));
        assert!((minor.last().unwrap() - 240.0).abs() < 1e-9);
        // 4 per major gap, 2 below the first major, 2 above the last
        assert_eq!(minor.len(), 4 * 4 + 2 + 2);
    }

    #[test]
    fn no_minor_without_two_majors() {
        assert!(Axis::new(0.0..1.0).ticks(vec![0.5]).minor(4).minor_ticks().is_empty());
    }

    #[test]
    fn frame_maps_corners() {
        let frame = Frame::new(
            100..500,
            50..250,
            Axis::new(0.0..360.0),
            Axis::new(-16.0..12.0),
        );
        assert_eq!(frame.x_px(0.0), 100);
        assert_eq!(frame.x_px(360.0), 500);
        assert_eq!(frame.x_px(180.0), 300);
        assert_eq!(frame.y_px(-16.0), 250);
        assert_eq!(frame.y_px(12.0), 50);
        assert_eq!(frame.width(), 400);
    }

    #[test]
    fn visible_major_drops_out_of_range() {
        let axis = Axis::new(1880.0..2000.0).ticks(linspace(1860.0, 2020.0, 9));
        assert_eq!(axis.visible_major(), vec![1880.0, 1900.0, 1920.0, 1940.0, 1960.0, 1980.0, 2000.0]);
    }
}
