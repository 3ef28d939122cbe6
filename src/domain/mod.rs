//! Shared domain types.
//!
//! This module defines:
//!
//! - the four prediction domains and their lifecycle status
//! - the generic input record type used by single and batch prediction
//! - the domain-shaped prediction result types
//! - field-coercion helpers for pulling typed values out of records

pub mod fields;
pub mod types;

pub use types::*;
