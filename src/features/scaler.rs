//! Numeric standardization (mean/scale per design column).
//!
//! Matches the usual standard-scaler contract: population statistics
//! (ddof = 0), and a zero-variance column keeps a scale of 1.0 so constant
//! features pass through centered instead of dividing by zero.

use nalgebra::DMatrix;

use crate::error::{ModelError, Result};

#[derive(Debug, Clone)]
pub struct ScalerState {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl ScalerState {
    /// Fit per-column mean and standard deviation on the training matrix.
    pub fn fit(x: &DMatrix<f64>) -> Result<Self> {
        if x.nrows() == 0 {
            return Err(ModelError::Numerical {
                message: "cannot fit scaler on an empty matrix".to_string(),
            });
        }

        let n = x.nrows() as f64;
        let mut means = Vec::with_capacity(x.ncols());
        let mut scales = Vec::with_capacity(x.ncols());

        for j in 0..x.ncols() {
            let col = x.column(j);
            let mean = col.sum() / n;
            let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            let std = var.sqrt();
            means.push(mean);
            scales.push(if std > 0.0 { std } else { 1.0 });
        }

        Ok(ScalerState { means, scales })
    }

    /// Standardize one feature vector in place.
    pub fn transform(&self, features: &mut [f64]) -> Result<()> {
        if features.len() != self.means.len() {
            return Err(ModelError::Numerical {
                message: format!(
                    "scaler fitted on {} columns, got {}",
                    self.means.len(),
                    features.len()
                ),
            });
        }
        for (i, v) in features.iter_mut().enumerate() {
            *v = (*v - self.means[i]) / self.scales[i];
        }
        Ok(())
    }

    /// Standardize every row of a training matrix (returns a new matrix).
    pub fn transform_matrix(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        let mut out = x.clone();
        for i in 0..out.nrows() {
            for j in 0..out.ncols() {
                out[(i, j)] = (out[(i, j)] - self.means[j]) / self.scales[j];
            }
        }
        Ok(out)
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardizes_to_zero_mean_unit_variance() {
        let x = DMatrix::from_row_slice(4, 1, &[1.0, 2.0, 3.0, 4.0]);
        let scaler = ScalerState::fit(&x).unwrap();
        let z = scaler.transform_matrix(&x).unwrap();

        let mean: f64 = z.column(0).sum() / 4.0;
        let var: f64 = z.column(0).iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 4.0;
        assert!(mean.abs() < 1e-12);
        assert!((var - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_column_is_centered_not_divided_by_zero() {
        let x = DMatrix::from_row_slice(3, 1, &[5.0, 5.0, 5.0]);
        let scaler = ScalerState::fit(&x).unwrap();
        let mut row = [5.0];
        scaler.transform(&mut row).unwrap();
        assert_eq!(row[0], 0.0);
    }

    #[test]
    fn transform_rejects_wrong_width() {
        let x = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let scaler = ScalerState::fit(&x).unwrap();
        let mut row = [1.0];
        assert!(scaler.transform(&mut row).is_err());
    }
}
