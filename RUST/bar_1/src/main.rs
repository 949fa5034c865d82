// Southern Oscillation Index as bars, three ways (NCL bar_1).
//
// USAGE  cargo run --release -p bar_1 -- /path/to/soi.nc [bar_1.png]

use anyhow::{anyhow, bail, Result};
use ncl_viz::chart::{self, Axis, Frame, Side, TickStyle};
use ncl_viz::{bar_outline, is_non_decreasing, log, nan_min, open_time_series, replace_nan, stride, timeit, yyyymm_to_yyyyfrac};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::{env, ops::Range, path::Path};

// ─────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────
const DATE_VAR:   &str  = "date";
const VALUE_VAR:  &str  = "DSOI_KET";
const STRIDE:     usize = 8;
const BAR_WIDTH:  f64   = 8.0 / 12.0;
const BAR_BOTTOM: f64   = -1.75;
const FIG_SIZE:   (u32, u32) = (700, 700);
// first / last samples (from each end) kept inside the x limits
const XLIM_HEAD:  usize = 40;
const XLIM_TAIL:  usize = 16;

type Bar = [(f64, f64); 2];

// ─────────────────────────────────────────────────────────────────────
// Bar geometry
// ─────────────────────────────────────────────────────────────────────

/// Cuts a bar to the x limits; `None` once nothing of it is left.
fn clip_bar([a, b]: Bar, xlim: &Range<f64>) -> Option<Bar> {
    let (left, right) = (a.0.max(xlim.start), b.0.min(xlim.end));
    (left < right).then_some([(left, a.1), (right, b.1)])
}

/// Bars centred on `x`, rising from `bottom` by `y - baseline`.
fn centered_bars(xs: &[f64], ys: &[f64], bottom: f64, baseline: f64, xlim: &Range<f64>) -> Vec<Bar> {
    xs.iter()
        .zip(ys)
        .filter(|(_, y)| !y.is_nan())
        .map(|(&x, &y)| [(x - BAR_WIDTH / 2.0, bottom), (x + BAR_WIDTH / 2.0, bottom + y - baseline)])
        .filter_map(|bar| clip_bar(bar, xlim))
        .collect()
}

/// Bars whose left edge sits on `x`, drawn from zero to `y`.
fn edge_bars(xs: &[f64], ys: &[f64], xlim: &Range<f64>) -> Vec<Bar> {
    xs.iter()
        .zip(ys)
        .filter(|(_, y)| !y.is_nan())
        .map(|(&x, &y)| [(x, 0.0), (x + BAR_WIDTH, y)])
        .filter_map(|bar| clip_bar(bar, xlim))
        .collect()
}

/// Fractional years of the date codes, which must never run backwards.
fn fractional_years(dates: &[i64]) -> Result<Vec<f64>> {
    let frac = yyyymm_to_yyyyfrac(dates)?;
    if !is_non_decreasing(&frac) {
        bail!("{DATE_VAR} is not in chronological order");
    }
    Ok(frac)
}

fn bars_range(bars: &[Bar]) -> Range<f64> {
    chart::padded_range(bars.iter().flat_map(|[a, b]| [a.1, b.1]))
}

// ─────────────────────────────────────────────────────────────────────
// Drawing
// ─────────────────────────────────────────────────────────────────────

fn axes(x: Axis, y: Axis) -> (Axis, Axis) {
    (x.minor(4), y.ticks(chart::arange(-2.0, 2.0, 0.5)).minor(5))
}

fn frame_and_ticks<DB>(
    root: &DrawingArea<DB, Shift>,
    frame: &Frame,
    title: &str,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let ticks = TickStyle::default().font(10.0);
    chart::draw_border(root, frame)?;
    chart::draw_axis(root, frame, Side::Bottom, 0, &ticks)?;
    chart::draw_axis(root, frame, Side::Left, 0, &ticks)?;
    chart::draw_axis(root, frame, Side::Top, 0, &ticks.clone().no_labels())?;
    chart::draw_axis(root, frame, Side::Right, 0, &ticks.no_labels())?;
    chart::draw_titles(root, frame, Some((title, 16.0)), None, None)?;
    Ok(())
}

fn draw_bar_panel<DB>(
    root: &DrawingArea<DB, Shift>,
    area: &DrawingArea<DB, Shift>,
    bars: &[Bar],
    x: Axis,
    title: &str,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (x, y) = axes(x, Axis::new(bars_range(bars)));
    let mut chart = ChartBuilder::on(area)
        .margin_top(30)
        .margin_right(20)
        .x_label_area_size(30)
        .y_label_area_size(45)
        .build_cartesian_2d(x.range.clone(), y.range.clone())?;

    chart.draw_series(bars.iter().map(|&[a, b]| Rectangle::new([a, b], WHITE.filled())))?;
    chart.draw_series(bars.iter().map(|&[a, b]| Rectangle::new([a, b], BLACK.stroke_width(1))))?;

    frame_and_ticks(root, &Frame::of_chart(&chart, x, y), title)
}

fn draw_outline_panel<DB>(
    root: &DrawingArea<DB, Shift>,
    area: &DrawingArea<DB, Shift>,
    xs: &[f64],
    ys: &[f64],
    x: Axis,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (ox, oy) = bar_outline(xs, &replace_nan(ys, 0.0));
    let inside = |&(px, _): &(f64, f64)| px >= x.range.start && px <= x.range.end;
    let path: Vec<(f64, f64)> = ox.into_iter().zip(oy).filter(inside).collect();

    let (x, y) = axes(x.clone(), Axis::new(chart::padded_range(path.iter().map(|p| p.1).chain([0.0]))));
    let mut chart = ChartBuilder::on(area)
        .margin_top(30)
        .margin_right(20)
        .x_label_area_size(30)
        .y_label_area_size(45)
        .build_cartesian_2d(x.range.clone(), y.range.clone())?;

    chart.draw_series(AreaSeries::new(path.iter().copied(), 0.0, WHITE.filled()))?;
    chart.draw_series(LineSeries::new(path.iter().copied(), BLACK.stroke_width(1)))?;

    frame_and_ticks(root, &Frame::of_chart(&chart, x, y), "Bar plot with outlines")
}

// ─────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────
fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let input = args
        .next()
        .ok_or_else(|| anyhow!("Usage: bar_1 <soi.nc> [out.png]"))?;
    let output = args.next().unwrap_or_else(|| "bar_1.png".to_string());

    log(format!("reading {input}"));
    let series = timeit("open_time_series", || {
        open_time_series(Path::new(&input), DATE_VAR, VALUE_VAR)
    })?;

    let frac = timeit("fractional_years", || fractional_years(&series.dates))?;
    if frac.len() <= XLIM_HEAD + XLIM_TAIL {
        bail!("{VALUE_VAR}: need more than {} samples, got {}", XLIM_HEAD + XLIM_TAIL, frac.len());
    }

    let xs = stride(&frac, STRIDE, 0)?;
    let ys = stride(&series.values, STRIDE, 0)?;
    let baseline = nan_min(&ys).ok_or_else(|| anyhow!("{VALUE_VAR} has no valid samples"))?;
    let zoom = frac[XLIM_HEAD]..frac[frac.len() - XLIM_TAIL];
    log(format!("{} bars, baseline {baseline:.3}, x {:.2}..{:.2}", xs.len(), zoom.start, zoom.end));

    timeit("render", || -> Result<()> {
        let root = BitMapBackend::new(&output, FIG_SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let panels = root.split_evenly((3, 1));

        let decades = Axis::new(zoom.clone()).ticks(chart::linspace(1900.0, 1980.0, 5));
        draw_bar_panel(&root, &panels[0], &centered_bars(&xs, &ys, BAR_BOTTOM, baseline, &zoom), decades.clone(), "Bar plot")?;

        let wide = Axis::new(1880.0..2000.0).ticks(chart::linspace(1880.0, 2000.0, 7));
        draw_outline_panel(&root, &panels[1], &xs, &ys, wide)?;

        draw_bar_panel(&root, &panels[2], &edge_bars(&xs, &ys, &zoom), decades, "Bar plot with a reference line")?;

        root.present()?;
        Ok(())
    })?;

    log(format!("Finished OK → {output}"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_bars_start_at_bottom() {
        let bars = centered_bars(&[1900.0, 1901.0], &[0.5, -1.0], BAR_BOTTOM, -1.0, &(0.0..3000.0));
        assert_eq!(bars.len(), 2);
        assert!((bars[0][0].0 - (1900.0 - BAR_WIDTH / 2.0)).abs() < 1e-12);
        assert_eq!(bars[0][0].1, BAR_BOTTOM);
        assert!((bars[0][1].1 - (BAR_BOTTOM + 1.5)).abs() < 1e-12);
        // the minimum sample gets a zero-height bar
        assert!((bars[1][1].1 - BAR_BOTTOM).abs() < 1e-12);
    }

    #[test]
    fn bars_straddling_the_limits_are_cut() {
        let xlim = 1900.0..1950.0;
        let bars = edge_bars(&[1899.5, 1925.0, 1949.9], &[1.0, 2.0, -1.0], &xlim);
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0], [(1900.0, 0.0), (1899.5 + BAR_WIDTH, 1.0)]);
        assert_eq!(bars[2], [(1949.9, 0.0), (1950.0, -1.0)]);

        let bars = centered_bars(&[1900.0], &[1.0], BAR_BOTTOM, 0.0, &xlim);
        assert_eq!(bars[0][0].0, 1900.0);
        assert!((bars[0][1].0 - (1900.0 + BAR_WIDTH / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn dates_out_of_order_are_rejected() {
        assert!(fractional_years(&[190001, 190002, 190012]).is_ok());
        let err = fractional_years(&[190001, 190003, 190002]).unwrap_err();
        assert!(err.to_string().contains("chronological"));
    }

    #[test]
    fn missing_samples_and_out_of_view_bars_are_dropped() {
        let xs = [1870.0, 1900.0, 1950.0, 1999.9];
        let ys = [1.0, f64::NAN, -0.5, 2.0];
        let bars = edge_bars(&xs, &ys, &(1880.0..1990.0));
        assert_eq!(bars, vec![[(1950.0, 0.0), (1950.0 + BAR_WIDTH, -0.5)]]);
    }
}
