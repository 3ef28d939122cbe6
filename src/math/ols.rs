//! Least squares solver.
//!
//! Every regressor in this crate is linear in its parameters given a fixed
//! design row, so training reduces to one ordinary least squares solve per
//! target:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - SVD-based solve so tall design matrices (1000 rows, a handful of
//!   columns) are handled robustly.
//! - One-hot categorical blocks make the design rank-deficient together with
//!   the intercept column; the SVD pseudo-inverse resolves this by returning
//!   the minimum-norm solution, which is deterministic and predicts exactly
//!   on any row with the same one-hot structure.

use nalgebra::{DMatrix, DVector};

use crate::error::{ModelError, Result};

/// Solve an ordinary least squares problem via SVD.
///
/// Tries progressively looser singular-value tolerances before giving up on
/// an ill-conditioned system.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Ok(beta);
            }
        }
    }

    Err(ModelError::Numerical {
        message: "least-squares system is too ill-conditioned to solve".to_string(),
    })
}
