//! A row-major score matrix for set - set similarity
//!
//! Rows are the terms of the query, columns the terms of the reference.
//!
//! | Index |   0 |   1 |   2 |
//! |:----- | ---:| ---:| ---:|
//! | **0** | 0.1 | 0.7 | 0.0 |
//! | **1** | 1.2 | 0.3 | 0.4 |
//!
//! `row_maxes` yields `[0.7, 1.2]`, `col_maxes` yields `[1.2, 0.7, 0.4]`.
//!
//! The caller must ensure that `rows * cols` matches the data length.
use std::fmt::Debug;

use crate::count_to_f64;

pub(crate) struct Matrix<'a> {
    rows: usize,
    cols: usize,
    data: &'a [f64],
}

impl<'a> Matrix<'a> {
    pub fn new(rows: usize, cols: usize, data: &'a [f64]) -> Self {
        debug_assert_eq!(rows * cols, data.len());
        Self { rows, cols, data }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [f64]> {
        let (data, cols) = (self.data, self.cols);
        (0..self.rows).map(move |idx| &data[idx * cols..(idx + 1) * cols])
    }

    pub fn col(&self, idx: usize) -> impl Iterator<Item = &'a f64> {
        self.data.iter().skip(idx).step_by(self.cols.max(1))
    }

    /// The maximum value of each row
    pub fn row_maxes(&self) -> Vec<f64> {
        self.rows()
            .map(|row| row.iter().copied().fold(0.0, f64::max))
            .collect()
    }

    /// The maximum value of each column
    pub fn col_maxes(&self) -> Vec<f64> {
        (0..self.cols)
            .map(|idx| self.col(idx).copied().fold(0.0, f64::max))
            .collect()
    }

    /// Average of the row maxima, 0 for an empty matrix
    pub fn row_max_mean(&self) -> f64 {
        mean(&self.row_maxes(), self.rows)
    }

    /// Average of the column maxima, 0 for an empty matrix
    pub fn col_max_mean(&self) -> f64 {
        mean(&self.col_maxes(), self.cols)
    }
}

fn mean(values: &[f64], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    values.iter().sum::<f64>() / count_to_f64(n)
}

impl Debug for Matrix<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let v: Vec<String> = row.iter().map(|v| format!("{v:.3}")).collect();
            writeln!(f, "[{}]", v.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let m = Matrix::new(2, 3, &data);
        let rows: Vec<&[f64]> = m.rows().collect();
        assert_eq!(rows, vec![&[1.0, 2.0, 3.0][..], &[4.0, 5.0, 6.0][..]]);
    }

    #[test]
    fn test_cols() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let m = Matrix::new(2, 3, &data);
        let col: Vec<f64> = m.col(1).copied().collect();
        assert_eq!(col, vec![2.0, 5.0]);
        let col: Vec<f64> = m.col(2).copied().collect();
        assert_eq!(col, vec![3.0, 6.0]);
    }

    #[test]
    fn test_maxes() {
        let data = vec![0.1, 0.7, 0.0, 1.2, 0.3, 0.4];
        let m = Matrix::new(2, 3, &data);
        assert_eq!(m.row_maxes(), vec![0.7, 1.2]);
        assert_eq!(m.col_maxes(), vec![1.2, 0.7, 0.4]);
        assert!((m.row_max_mean() - 0.95).abs() < 1e-9);
        assert!((m.col_max_mean() - 0.766_666_666).abs() < 1e-6);
    }

    #[test]
    fn test_empty() {
        let data: Vec<f64> = vec![];
        let m = Matrix::new(0, 3, &data);
        assert!(m.is_empty());
        assert_eq!(m.row_max_mean(), 0.0);
        assert_eq!(m.col_maxes(), vec![0.0, 0.0, 0.0]);

        let m = Matrix::new(2, 0, &data);
        assert_eq!(m.row_maxes(), vec![0.0, 0.0]);
        assert_eq!(m.row_max_mean(), 0.0);
        assert_eq!(m.col_max_mean(), 0.0);
    }
}
