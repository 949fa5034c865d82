use chrono::NaiveDate;

use crate::{Error, Result};

/// `YYYYMM` → `YYYY + (MM - 1) / 12`.
///
/// The month is validated through `NaiveDate`; anything outside 1..=12
/// (or a year chrono cannot represent) is rejected rather than clamped.
pub fn date_code_to_frac(code: i64) -> Result<f64> {
    let year = code.div_euclid(100);
    let month = code.rem_euclid(100);

    let valid = i32::try_from(year)
        .ok()
        .zip(u32::try_from(month).ok())
        .and_then(|(y, m)| NaiveDate::from_ymd_opt(y, m, 1))
        .is_some();
    if !valid {
        return Err(Error::InvalidDateCode { code, month });
    }

    Ok(year as f64 + (month - 1) as f64 / 12.0)
}

/// Converts a whole date column; fails on the first invalid code.
pub fn yyyymm_to_yyyyfrac(codes: &[i64]) -> Result<Vec<f64>> {
    codes.iter().map(|&c| date_code_to_frac(c)).collect()
}
