// Radar reflectivity sweep on a Cartesian grid (NCL radar_1).
//
// USAGE  cargo run --release -p radar_1 -- /path/to/dz.nc [radar_1.png] [wrap_prefix]
//
// `wrap_prefix` is the number of leading azimuth samples recorded before
// the sweep crossed north; it defaults to the 63 of the reference scan.

use anyhow::{anyhow, Context, Result};
use ncl_viz::chart::{self, Axis, Frame, Side, TickStyle};
use ncl_viz::{
    is_non_decreasing, log, normalize_azimuth, open_radial_scan, project_polar, timeit, AffineMap, Band,
    ColorRamp, Grid2, Levels, PolarGrid, ScanGeometry,
};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::{env, path::Path};

// ─────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────
const VALUE_VAR:    &str = "DZ";
const AZIMUTH_VAR:  &str = "Azimuth";
const DZ_SCALE:     f64  = 100.0;
const MISSING:      f64  = -100_000_000.0;
const EXTENT_KM:    f64  = 240.0;
const FIG_SIZE:     (u32, u32) = (600, 800);
const UNDER_COLOR:  RGBColor = RGBColor(211, 211, 211);

type Quad = [(f64, f64); 4];

fn reflectivity_levels() -> Levels {
    Levels::arange(-2000.0, 7000.0, 500.0)
}

// ─────────────────────────────────────────────────────────────────────
// Banding
// ─────────────────────────────────────────────────────────────────────

/// One quad per grid cell, coloured by the band of its lower-left node.
/// Cells poking outside `±extent` and cells above the top level are dropped.
fn band_cells(grid: &PolarGrid, values: &Grid2, levels: &Levels, extent: f64) -> Vec<(Band, Quad)> {
    let (rows, cols) = grid.shape();
    let node = |a: usize, r: usize| -> Option<(f64, f64)> {
        let p = (grid.x.get(a, r)?, grid.y.get(a, r)?);
        (p.0.abs() <= extent && p.1.abs() <= extent).then_some(p)
    };

    let mut cells = Vec::new();
    for a in 0..rows.saturating_sub(1) {
        for r in 0..cols.saturating_sub(1) {
            let band = match values.get(a, r).map(|v| levels.band(v)) {
                Some(b @ (Band::Under | Band::Index(_))) => b,
                _ => continue,
            };
            let corners = (node(a, r), node(a, r + 1), node(a + 1, r + 1), node(a + 1, r));
            if let (Some(p0), Some(p1), Some(p2), Some(p3)) = corners {
                cells.push((band, [p0, p1, p2, p3]));
            }
        }
    }
    cells
}

// ─────────────────────────────────────────────────────────────────────
// Drawing
// ─────────────────────────────────────────────────────────────────────

fn render<DB>(
    root: &DrawingArea<DB, Shift>,
    cells: &[(Band, Quad)],
    levels: &Levels,
    long_name: &str,
    units: &str,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let (upper, _) = root.split_vertically(660);

    let ticks = chart::arange(-200.0, 201.0, 100.0);
    let x = Axis::new(-EXTENT_KM..EXTENT_KM).ticks(ticks.clone()).minor(5);
    let y = Axis::new(-EXTENT_KM..EXTENT_KM).ticks(ticks).minor(5);

    let mut plot = ChartBuilder::on(&upper)
        .margin_top(50)
        .margin_right(30)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x.range.clone(), y.range.clone())?;

    let colors = ColorRamp::gui_default().band_colors(levels.bands());
    plot.draw_series(cells.iter().filter_map(|(band, quad)| {
        let color = match *band {
            Band::Under => UNDER_COLOR,
            Band::Index(i) => *colors.get(i)?,
            Band::Over | Band::Missing => return None,
        };
        Some(Polygon::new(quad.to_vec(), color.filled()))
    }))?;

    let frame = Frame::of_chart(&plot, x, y);
    let style = TickStyle::default();
    chart::draw_border(root, &frame)?;
    chart::draw_axis(root, &frame, Side::Bottom, 0, &style)?;
    chart::draw_axis(root, &frame, Side::Left, 0, &style)?;
    chart::draw_axis(root, &frame, Side::Top, 0, &style.clone().no_labels())?;
    chart::draw_axis(root, &frame, Side::Right, 0, &style.no_labels())?;
    chart::draw_titles(root, &frame, None, Some((long_name, 16.0)), Some((units, 16.0)))?;

    let bar_top = frame.py.end + 60;
    chart::draw_colorbar(
        root,
        frame.px.clone(),
        bar_top..bar_top + 24,
        levels,
        &colors,
        &UNDER_COLOR,
        &chart::arange(-1500.0, 6500.0, 1500.0),
        12.0,
    )?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────
fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let input = args
        .next()
        .ok_or_else(|| anyhow!("Usage: radar_1 <dz.nc> [out.png] [wrap_prefix]"))?;
    let output = args.next().unwrap_or_else(|| "radar_1.png".to_string());

    let mut geometry = ScanGeometry::default();
    if let Some(arg) = args.next() {
        geometry.wrap_prefix = arg
            .parse()
            .with_context(|| format!("wrap_prefix must be a sample count, got {arg:?}"))?;
    }

    log(format!("reading {input}"));
    let scan = timeit("open_radial_scan", || open_radial_scan(Path::new(&input), VALUE_VAR, AZIMUTH_VAR))?;
    let (sweeps, bins) = scan.values.shape();
    log(format!("{VALUE_VAR}: {sweeps} azimuths × {bins} range bins"));

    let scale = AffineMap::scale(DZ_SCALE);
    let values = scan.values.map(|v| scale.apply(v)).replace_nan(MISSING);

    let azimuth = normalize_azimuth(&scan.azimuth, geometry.wrap_prefix)?;
    if !is_non_decreasing(&azimuth) {
        log(format!(
            "warning: azimuth still not monotonic after unrolling {} samples",
            geometry.wrap_prefix
        ));
    }

    let grid = timeit("project_polar", || project_polar(&geometry.ranges(bins), &azimuth));
    let levels = reflectivity_levels();
    let cells = timeit("band_cells", || band_cells(&grid, &values, &levels, EXTENT_KM));

    timeit("render", || -> Result<()> {
        let root = BitMapBackend::new(&output, FIG_SIZE).into_drawing_area();
        render(
            &root,
            &cells,
            &levels,
            scan.long_name.as_deref().unwrap_or(VALUE_VAR),
            scan.units.as_deref().unwrap_or(""),
        )?;
        root.present()?;
        Ok(())
    })?;

    log(format!("Finished OK, {} cells → {output}", cells.len()));
    Ok(())
}
