//! Shared pieces of the NCL plot ports.
//!
//! Every program under `RUST/` follows the same load → transform → draw
//! pipeline. The loaders and the pure transforms live here so that each
//! binary is only the drawing code for one figure.

pub mod chart;
pub mod dates;
pub mod grid;
pub mod levels;
pub mod loaders;
pub mod polar;
pub mod sampling;
pub mod timing;
pub mod units;

pub use dates::{date_code_to_frac, yyyymm_to_yyyyfrac};
pub use grid::Grid2;
pub use levels::{Band, ColorRamp, Levels};
pub use loaders::{open_radial_scan, open_time_series, read_ascii_columns, CfDecode, ColumnTable, RadialScan, TimeSeries};
pub use polar::{normalize_azimuth, project_polar, range_bins, replace_nan, PolarGrid, ScanGeometry};
pub use sampling::{bar_outline, is_non_decreasing, nan_min, stride};
pub use timing::{log, timeit};
pub use units::AffineMap;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to read input file")]
    Io(#[from] std::io::Error),
    #[error("failed to read netCDF dataset")]
    NetCdf(#[from] netcdf::Error),
    #[error("failed to read ascii columns")]
    Csv(#[from] csv::Error),
    #[error("failed to parse number {0:?}")]
    Parse(String),
    #[error("variable {0:?} not found in dataset")]
    MissingVariable(String),
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
    #[error("date code {code} has month {month}, expected 1..=12")]
    InvalidDateCode { code: i64, month: i64 },
    #[error("stride must be at least 1")]
    InvalidStride,
    #[error("wrap prefix {prefix} does not leave a reference sample in a sweep of {len}")]
    InvalidWrapPrefix { prefix: usize, len: usize },
    #[error("row {row}: expected {expected} fields, got {got}")]
    MalformedRow { row: usize, expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
