//! Numerical routines shared by the trainers.

pub mod ols;

pub use ols::solve_least_squares;
