//! `ecoml` library crate.
//!
//! The binary is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - a web front-end can embed the store/engine/batch pipeline directly
//! - modules stay easy to navigate as the project grows

pub mod app;
pub mod batch;
pub mod cli;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod features;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod report;
pub mod store;
pub mod train;
