// Three curves against longitude, each on its own Y axis (NCL xy_19).
//
// USAGE  cargo run --release -p xy_19 -- /path/to/xy.asc [xy_19.png]
//
// xy.asc holds four whitespace separated columns: grid index, u, v and
// temperature in Kelvin.

use anyhow::{anyhow, Result};
use ncl_viz::chart::{self, Axis, Frame, Side, TickStyle};
use ncl_viz::{log, read_ascii_columns, timeit, AffineMap};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::{env, mem, ops::Range, path::Path};

// ─────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────
const COLUMNS:      [&str; 4] = ["lon", "u", "v", "t"];
const LON_POINTS:   usize = 128;
const U_RANGE:      Range<f64> = 10.0..60.0;
const V_RANGE:      Range<f64> = -16.0..12.0;
// third spine sits this fraction of the plot width right of the frame
const V_AXIS_SHIFT: f64 = 0.15;
const FIG_SIZE:     (u32, u32) = (900, 800);

/// One curve and the axis it is read against.
struct Trace {
    name: &'static str,
    color: RGBColor,
    values: Vec<f64>,
    axis: Axis,
}

impl Trace {
    /// Runs of points in the host chart's coordinates. The curve is broken
    /// wherever a sample is missing or falls outside the host range.
    fn host_segments(&self, xs: &[f64], host: &Range<f64>) -> Vec<Vec<(f64, f64)>> {
        let to_host = AffineMap::between(self.axis.range.clone(), host.clone());
        let (lo, hi) = (host.start.min(host.end), host.start.max(host.end));
        let (mut segments, mut run) = (Vec::new(), Vec::new());
        for (&x, &v) in xs.iter().zip(&self.values) {
            let y = to_host.apply(v);
            if y >= lo - 1e-9 && y <= hi + 1e-9 {
                run.push((x, y));
            } else if !run.is_empty() {
                segments.push(mem::take(&mut run));
            }
        }
        if !run.is_empty() {
            segments.push(run);
        }
        segments
    }
}

// ─────────────────────────────────────────────────────────────────────
// Drawing
// ─────────────────────────────────────────────────────────────────────

fn render<DB>(root: &DrawingArea<DB, Shift>, lon: &[f64], traces: &[Trace; 3]) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let [t, u, v] = traces;
    let x = Axis::new(0.0..360.0).ticks(vec![0.0, 100.0, 200.0, 300.0]).minor(5);

    let mut plot = ChartBuilder::on(root)
        .margin(20)
        .margin_right(220)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(x.range.clone(), t.axis.range.clone())?;

    // legend lists entries in drawing order: v, u, t
    for trace in [v, u, t] {
        let color = trace.color;
        plot.draw_series(
            trace
                .host_segments(lon, &t.axis.range)
                .into_iter()
                .map(|seg| PathElement::new(seg, color.stroke_width(1))),
        )?
        .label(trace.name)
        .legend(move |(px, py)| PathElement::new(vec![(px, py), (px + 40, py)], color.stroke_width(1)));
    }
    plot.configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(&WHITE)
        .border_style(&BLACK)
        .label_font(("sans-serif", 14))
        .draw()?;

    let frame = Frame::of_chart(&plot, x, t.axis.clone());
    let style = TickStyle::default();
    chart::draw_border(root, &frame)?;
    chart::draw_axis(root, &frame, Side::Bottom, 0, &style)?;
    chart::draw_axis(root, &frame, Side::Top, 0, &style.clone().no_labels())?;
    chart::draw_axis(root, &frame, Side::Left, 0, &style)?;
    chart::draw_axis_label(root, &frame, Side::Left, 70, t.name, 16.0)?;

    let u_frame = frame.with_y(u.axis.clone());
    chart::draw_axis(root, &u_frame, Side::Right, 0, &style)?;
    chart::draw_axis_label(root, &u_frame, Side::Right, 45, u.name, 16.0)?;

    let shift = (frame.width() as f64 * V_AXIS_SHIFT).round() as i32;
    let v_frame = frame.with_y(v.axis.clone());
    chart::draw_axis(root, &v_frame, Side::Right, shift, &style)?;
    chart::draw_axis_label(root, &v_frame, Side::Right, shift + 45, v.name, 16.0)?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────
fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let input = args
        .next()
        .ok_or_else(|| anyhow!("Usage: xy_19 <xy.asc> [out.png]"))?;
    let output = args.next().unwrap_or_else(|| "xy_19.png".to_string());

    log(format!("reading {input}"));
    let table = timeit("read_ascii_columns", || read_ascii_columns(Path::new(&input), &COLUMNS))?;
    log(format!("{} rows", table.len()));

    let [lon, u, v, t]: [Vec<f64>; 4] = table
        .into_columns()
        .try_into()
        .map_err(|_| anyhow!("expected {} columns", COLUMNS.len()))?;

    let lon = AffineMap::index_to_longitude(LON_POINTS).apply_all(&lon);
    let t = AffineMap::kelvin_to_fahrenheit().apply_all(&t);

    let t_range = chart::padded_range(t.iter().copied());
    let traces = [
        Trace {
            name: "t",
            color: RED,
            axis: Axis::new(t_range.clone()).ticks(chart::nice_ticks(&t_range, 6)).minor(5),
            values: t,
        },
        Trace {
            name: "u",
            color: GREEN,
            axis: Axis::new(U_RANGE).ticks(chart::nice_ticks(&U_RANGE, 5)).minor(5),
            values: u,
        },
        Trace {
            name: "v",
            color: BLUE,
            axis: Axis::new(V_RANGE).ticks(chart::arange(-16.0, 13.0, 4.0)).minor(4),
            values: v,
        },
    ];

    timeit("render", || -> Result<()> {
        let root = BitMapBackend::new(&output, FIG_SIZE).into_drawing_area();
        render(&root, &lon, &traces)?;
        root.present()?;
        Ok(())
    })?;

    log(format!("Finished OK → {output}"));
    Ok(())
}
