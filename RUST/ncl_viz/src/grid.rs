use rayon::prelude::*;

use crate::{Error, Result};

/// Row-major `rows × cols` buffer of `f64`.
///
/// Shapes are checked on construction and every element-wise operation
/// keeps them; nothing broadcasts.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2 {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Grid2 {
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self { rows, cols, data: vec![value; rows * cols] }
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::ShapeMismatch { expected: rows * cols, got: data.len() });
        }
        Ok(Self { rows, cols, data })
    }

    pub(crate) fn from_raw(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }
    pub fn shape(&self) -> (usize, usize) { (self.rows, self.cols) }
    pub fn as_slice(&self) -> &[f64] { &self.data }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Element-wise map into a new grid of the same shape.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64 + Sync,
    {
        let data = self.data.par_iter().map(|&v| f(v)).collect();
        Self { rows: self.rows, cols: self.cols, data }
    }

    /// NaN entries become `sentinel`, everything else is copied as is.
    pub fn replace_nan(&self, sentinel: f64) -> Self {
        self.map(|v| if v.is_nan() { sentinel } else { v })
    }

    pub fn into_vec(self) -> Vec<f64> { self.data }
}
