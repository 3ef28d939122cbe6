//! Trained model artifacts.
//!
//! Two model families cover the four domains:
//!
//! - [`LinearModel`]: least-squares regressor over a fixed design row
//!   (carbon footprint, product scoring, the four ESG regressors)
//! - [`DecisionTree`]: gini-impurity classifier (packaging suggestion)
//!
//! Artifacts are immutable once fitted; retraining publishes a replacement.

pub mod linear;
pub mod tree;

pub use linear::LinearModel;
pub use tree::{DecisionTree, TreeParams};
