//! Linear regression artifact.
//!
//! The model is linear in its coefficients given a fixed design row; the
//! per-domain trainers decide what the design row contains (intercept,
//! raw numerics, one-hot categorical blocks, standardized or not).

use nalgebra::{DMatrix, DVector};

use crate::error::{ModelError, Result};
use crate::math::solve_least_squares;

#[derive(Debug, Clone)]
pub struct LinearModel {
    betas: Vec<f64>,
}

impl LinearModel {
    /// Fit coefficients on a design matrix and target vector.
    pub fn fit(design: &DMatrix<f64>, targets: &DVector<f64>) -> Result<Self> {
        if design.nrows() != targets.len() {
            return Err(ModelError::Numerical {
                message: format!(
                    "design has {} rows but targets has {}",
                    design.nrows(),
                    targets.len()
                ),
            });
        }
        let betas = solve_least_squares(design, targets)?;
        Ok(LinearModel {
            betas: betas.iter().copied().collect(),
        })
    }

    /// Predict for one design row (must match the fitted width).
    pub fn predict(&self, design_row: &[f64]) -> Result<f64> {
        if design_row.len() != self.betas.len() {
            return Err(ModelError::Numerical {
                message: format!(
                    "model fitted on {} columns, got {}",
                    self.betas.len(),
                    design_row.len()
                ),
            });
        }
        Ok(design_row
            .iter()
            .zip(self.betas.iter())
            .map(|(x, b)| x * b)
            .sum())
    }

    pub fn betas(&self) -> &[f64] {
        &self.betas
    }
}
