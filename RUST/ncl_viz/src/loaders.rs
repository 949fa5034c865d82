use std::{fs, path::Path};

use csv::{ReaderBuilder, Trim};

use crate::{AffineMap, Error, Grid2, Result};

// ─────────────────────────────────────────────────────────────────────
// Dataset records
// ─────────────────────────────────────────────────────────────────────

/// Monthly series keyed by `YYYYMM` codes.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    pub dates: Vec<i64>,
    pub values: Vec<f64>,
    pub long_name: Option<String>,
    pub units: Option<String>,
}

/// One radar sweep: rows follow `azimuth`, columns are range bins.
#[derive(Debug, Clone)]
pub struct RadialScan {
    pub azimuth: Vec<f64>,
    pub values: Grid2,
    pub long_name: Option<String>,
    pub units: Option<String>,
}

/// Equal-length numeric columns read by position.
#[derive(Debug, Clone)]
pub struct ColumnTable {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl ColumnTable {
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    pub fn into_columns(self) -> Vec<Vec<f64>> { self.columns }
}

// ─────────────────────────────────────────────────────────────────────
// netCDF
// ─────────────────────────────────────────────────────────────────────

fn open_dataset(path: &Path) -> Result<netcdf::File> {
    // surface a plain not-found before netCDF gets a chance to be vague
    fs::metadata(path)?;
    Ok(netcdf::open(path)?)
}

fn variable<'f>(file: &'f netcdf::File, name: &str) -> Result<netcdf::Variable<'f>> {
    file.variable(name)
        .ok_or_else(|| Error::MissingVariable(name.to_string()))
}

fn text_attribute(var: &netcdf::Variable<'_>, name: &str) -> Option<String> {
    match var.attribute_value(name)? {
        Ok(netcdf::AttributeValue::Str(s)) => Some(s),
        _ => None,
    }
}

/// First numeric value of an attribute, whatever its stored type.
fn numeric_attribute(var: &netcdf::Variable<'_>, name: &str) -> Option<f64> {
    use netcdf::AttributeValue as A;
    let v = match var.attribute_value(name)?.ok()? {
        A::Double(v) => v,
        A::Float(v) => v.into(),
        A::Int(v) => v.into(),
        A::Uint(v) => v.into(),
        A::Short(v) => v.into(),
        A::Ushort(v) => v.into(),
        A::Schar(v) => v.into(),
        A::Uchar(v) => v.into(),
        A::Longlong(v) => v as f64,
        A::Ulonglong(v) => v as f64,
        A::Doubles(v) => *v.first()?,
        A::Floats(v) => (*v.first()?).into(),
        A::Ints(v) => (*v.first()?).into(),
        A::Shorts(v) => (*v.first()?).into(),
        _ => return None,
    };
    Some(v)
}

/// CF decoding of stored values: `_FillValue` / `missing_value` samples
/// become NaN, the rest are unpacked with `scale_factor` / `add_offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CfDecode {
    pub fill: Option<f64>,
    pub missing: Option<f64>,
    pub unpack: AffineMap,
}

impl Default for CfDecode {
    fn default() -> Self {
        Self { fill: None, missing: None, unpack: AffineMap::IDENTITY }
    }
}

impl CfDecode {
    pub fn of(var: &netcdf::Variable<'_>) -> Self {
        Self {
            fill: numeric_attribute(var, "_FillValue"),
            missing: numeric_attribute(var, "missing_value"),
            unpack: AffineMap {
                scale: numeric_attribute(var, "scale_factor").unwrap_or(1.0),
                shift: numeric_attribute(var, "add_offset").unwrap_or(0.0),
                ..AffineMap::IDENTITY
            },
        }
    }

    /// Masks on the raw value, before unpacking.
    pub fn apply(&self, raw: f64) -> f64 {
        if self.fill == Some(raw) || self.missing == Some(raw) {
            f64::NAN
        } else {
            self.unpack.apply(raw)
        }
    }

    pub fn apply_all(&self, raw: Vec<f64>) -> Vec<f64> {
        if *self == Self::default() {
            return raw;
        }
        raw.into_iter().map(|v| self.apply(v)).collect()
    }
}

fn decoded_values(var: &netcdf::Variable<'_>) -> Result<Vec<f64>> {
    Ok(CfDecode::of(var).apply_all(var.get_values::<f64, _>(..)?))
}

/// Reads a `YYYYMM` date variable and a measurement sharing its dimension.
pub fn open_time_series(path: &Path, date_var: &str, value_var: &str) -> Result<TimeSeries> {
    let file = open_dataset(path)?;
    let dates = decoded_values(&variable(&file, date_var)?)?;
    let var = variable(&file, value_var)?;
    let values = decoded_values(&var)?;

    if dates.len() != values.len() {
        return Err(Error::ShapeMismatch { expected: dates.len(), got: values.len() });
    }
    if let Some(i) = dates.iter().position(|d| !d.is_finite()) {
        return Err(Error::Parse(format!("{date_var}[{i}] is missing")));
    }

    Ok(TimeSeries {
        dates: dates.iter().map(|d| d.round() as i64).collect(),
        values,
        long_name: text_attribute(&var, "long_name"),
        units: text_attribute(&var, "units"),
    })
}

/// Reads a 2-D `(azimuth, range)` field and its azimuth coordinate.
pub fn open_radial_scan(path: &Path, value_var: &str, azimuth_var: &str) -> Result<RadialScan> {
    let file = open_dataset(path)?;
    let var = variable(&file, value_var)?;

    let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let &[rows, cols] = dims.as_slice() else {
        return Err(Error::ShapeMismatch { expected: 2, got: dims.len() });
    };

    let values = Grid2::from_vec(rows, cols, decoded_values(&var)?)?;
    let azimuth = decoded_values(&variable(&file, azimuth_var)?)?;
    if azimuth.len() != rows {
        return Err(Error::ShapeMismatch { expected: rows, got: azimuth.len() });
    }

    Ok(RadialScan {
        azimuth,
        values,
        long_name: text_attribute(&var, "long_name"),
        units: text_attribute(&var, "units"),
    })
}

// ─────────────────────────────────────────────────────────────────────
// ASCII columns
// ─────────────────────────────────────────────────────────────────────

/// Whitespace-delimited numeric table, one column per entry of `names`.
///
/// Blank lines are skipped; any other row must carry exactly
/// `names.len()` fields.
pub fn read_ascii_columns(path: &Path, names: &[&str]) -> Result<ColumnTable> {
    let text = fs::read_to_string(path)?.replace('\t', " ");
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b' ')
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut columns = vec![Vec::new(); names.len()];
    for (row, result) in rdr.records().enumerate() {
        let rec = result?;
        let fields: Vec<&str> = rec.iter().filter(|f| !f.is_empty()).collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != names.len() {
            return Err(Error::MalformedRow { row: row + 1, expected: names.len(), got: fields.len() });
        }
        for (col, field) in columns.iter_mut().zip(&fields) {
            col.push(field.parse().map_err(|_| Error::Parse(field.to_string()))?);
        }
    }

    Ok(ColumnTable {
        names: names.iter().map(|n| n.to_string()).collect(),
        columns,
    })
}
