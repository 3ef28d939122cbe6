//! Tabular input handling for batch jobs.

pub mod table;

pub use table::{BatchTable, read_csv_table, sample_csv};
