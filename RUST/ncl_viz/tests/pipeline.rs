use ncl_viz::*;
use std::path::{Path, PathBuf};

fn write_soi(dir: &Path) -> PathBuf {
    let path = dir.join("soi.nc");
    let mut nc = netcdf::create(&path).unwrap();
    nc.add_dimension("time", 6).unwrap();
    {
        let mut v = nc.add_variable::<f64>("date", &["time"]).unwrap();
        v.put_values(&[188201.0, 188202.0, 188203.0, 188212.0, 188301.0, 188302.0], ..).unwrap();
    }
    {
        let mut v = nc.add_variable::<f64>("DSOI_KET", &["time"]).unwrap();
        v.put_values(&[0.4, -1.2, f64::NAN, 0.9, -0.3, 1.1], ..).unwrap();
        v.put_attribute("long_name", "Darwin SOI").unwrap();
        v.put_attribute("units", "hPa").unwrap();
    }
    drop(nc);
    path
}

fn write_dz(dir: &Path) -> PathBuf {
    let path = dir.join("dz.nc");
    let mut nc = netcdf::create(&path).unwrap();
    nc.add_dimension("azimuth", 4).unwrap();
    nc.add_dimension("range", 3).unwrap();
    {
        let mut v = nc.add_variable::<f64>("Azimuth", &["azimuth"]).unwrap();
        v.put_values(&[358.0, 359.0, 1.0, 2.0], ..).unwrap();
    }
    {
        let mut v = nc.add_variable::<f64>("DZ", &["azimuth", "range"]).unwrap();
        let dz = [
            10.0, f64::NAN, 12.0, //
            11.0, 13.0, 14.0, //
            f64::NAN, 20.0, 21.0, //
            30.0, 31.0, 32.0,
        ];
        v.put_values(&dz, ..).unwrap();
        v.put_attribute("long_name", "Reflectivity").unwrap();
        v.put_attribute("units", "dBZ").unwrap();
    }
    drop(nc);
    path
}

#[test]
fn test_time_series_to_bars() {
    let dir = tempfile::tempdir().unwrap();
    let series = open_time_series(&write_soi(dir.path()), "date", "DSOI_KET").unwrap();
    assert_eq!(series.dates[3], 188212);
    assert_eq!(series.units.as_deref(), Some("hPa"));
    assert_eq!(series.long_name.as_deref(), Some("Darwin SOI"));

    let frac = yyyymm_to_yyyyfrac(&series.dates).unwrap();
    assert_eq!(frac[0], 1882.0);
    assert!((frac[3] - (1882.0 + 11.0 / 12.0)).abs() < 1e-12);
    assert_eq!(frac[4], 1883.0);
    assert!(is_non_decreasing(&frac));

    let xs = stride(&frac, 2, 0).unwrap();
    let ys = stride(&series.values, 2, 0).unwrap();
    assert_eq!(xs, vec![frac[0], frac[2], frac[4]]);
    assert_eq!(nan_min(&ys), Some(-0.3));
}

#[test]
fn test_missing_variable() {
    let dir = tempfile::tempdir().unwrap();
    let err = open_time_series(&write_soi(dir.path()), "date", "DSOI_DEC").unwrap_err();
    assert!(matches!(err, Error::MissingVariable(ref v) if v == "DSOI_DEC"));
}

#[test]
fn test_radial_scan_projection() {
    let dir = tempfile::tempdir().unwrap();
    let scan = open_radial_scan(&write_dz(dir.path()), "DZ", "Azimuth").unwrap();
    assert_eq!(scan.values.shape(), (4, 3));
    assert_eq!(scan.units.as_deref(), Some("dBZ"));

    let geometry = ScanGeometry { cell_size: 0.25, wrap_prefix: 2 };
    let azimuth = normalize_azimuth(&scan.azimuth, geometry.wrap_prefix).unwrap();
    assert_eq!(azimuth, vec![-2.0, -1.0, 1.0, 2.0]);

    let values = scan.values.map(|v| AffineMap::scale(100.0).apply(v)).replace_nan(-1.0e8);
    assert_eq!(values.get(0, 1), Some(-1.0e8));
    assert_eq!(values.get(2, 0), Some(-1.0e8));
    assert_eq!(values.get(3, 2), Some(3200.0));

    let grid = project_polar(&geometry.ranges(values.cols()), &azimuth);
    assert_eq!(grid.shape(), values.shape());
    let (x, y) = (grid.x.get(0, 2).unwrap(), grid.y.get(0, 2).unwrap());
    assert!((x.hypot(y) - 0.5).abs() < 1e-12);
    assert!(y < 0.0, "unrolled azimuth sits just below east");

    let levels = Levels::arange(-2000.0, 7000.0, 500.0);
    assert_eq!(levels.band(values.get(0, 1).unwrap()), Band::Under);
}

#[test]
fn test_fill_values_read_as_nan() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("soi_fill.nc");
    {
        let mut nc = netcdf::create(&path).unwrap();
        nc.add_dimension("time", 3).unwrap();
        {
            let mut d = nc.add_variable::<f64>("date", &["time"]).unwrap();
            d.put_values(&[195001.0, 195002.0, 195003.0], ..).unwrap();
        }
        let mut v = nc.add_variable::<f64>("DSOI_KET", &["time"]).unwrap();
        v.set_fill_value(-999.0).unwrap();
        v.put_values(&[0.4, -999.0, 0.9], ..).unwrap();
    }

    let series = open_time_series(&path, "date", "DSOI_KET").unwrap();
    assert_eq!(series.values[0], 0.4);
    assert!(series.values[1].is_nan());
    // the fill sample must not become the bar baseline
    assert_eq!(nan_min(&series.values), Some(0.4));
}

#[test]
fn test_packed_scan_is_unpacked_and_masked() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dz_packed.nc");
    {
        let mut nc = netcdf::create(&path).unwrap();
        nc.add_dimension("azimuth", 2).unwrap();
        nc.add_dimension("range", 2).unwrap();
        {
            let mut a = nc.add_variable::<f64>("Azimuth", &["azimuth"]).unwrap();
            a.put_values(&[0.0, 1.0], ..).unwrap();
        }
        let mut v = nc.add_variable::<f64>("DZ", &["azimuth", "range"]).unwrap();
        v.put_attribute("missing_value", -32768.0).unwrap();
        v.put_attribute("scale_factor", 0.5).unwrap();
        v.put_attribute("add_offset", 10.0).unwrap();
        v.put_values(&[0.0, 20.0, -32768.0, 4.0], ..).unwrap();
    }

    let scan = open_radial_scan(&path, "DZ", "Azimuth").unwrap();
    assert_eq!(scan.values.get(0, 0), Some(10.0));
    assert_eq!(scan.values.get(0, 1), Some(20.0));
    assert!(scan.values.get(1, 0).unwrap().is_nan());

    let values = scan.values.map(|v| AffineMap::scale(100.0).apply(v)).replace_nan(-1.0e8);
    assert_eq!(values.get(1, 0), Some(-1.0e8));
    assert_eq!(values.get(1, 1), Some(1200.0));
}

#[test]
fn test_ascii_columns() {
    let table = read_ascii_columns(Path::new("tests/data/xy.asc"), &["lon", "u", "v", "t"]).unwrap();
    assert_eq!(table.len(), 17);

    let lon = AffineMap::index_to_longitude(128).apply_all(table.column("lon").unwrap());
    assert_eq!(lon[0], 0.0);
    assert!((lon[16] - 360.0).abs() < 1e-9);
    assert!(is_non_decreasing(&lon));

    let t = AffineMap::kelvin_to_fahrenheit().apply_all(table.column("t").unwrap());
    assert_eq!(t.len(), table.len());
    // 217.5 K
    assert!((t[0] - (-68.17)).abs() < 1e-6);
}
