//! Terminal formatting for statuses and batch summaries.

pub mod format;

pub use format::{format_batch_summary, format_status};
