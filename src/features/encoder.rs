//! Category <-> integer-code translation tables.
//!
//! Vocabulary is exactly the set of category values observed in the domain's
//! synthetic training set, sorted lexicographically so codes are stable
//! across retrains. Encoding a value outside the vocabulary is an explicit
//! [`ModelError::UnknownCategory`], never a silent default — the fallback
//! policy lives in the engine, not here.

use std::collections::HashMap;

use crate::error::{ModelError, Result};

/// Bidirectional category <-> code table for one feature.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    feature: String,
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Build an encoder from observed values; duplicates are collapsed and
    /// the vocabulary is sorted.
    pub fn fit<S: AsRef<str>>(feature: &str, observed: &[S]) -> Self {
        let mut classes: Vec<String> = observed.iter().map(|s| s.as_ref().to_string()).collect();
        classes.sort();
        classes.dedup();
        LabelEncoder {
            feature: feature.to_string(),
            classes,
        }
    }

    pub fn encode(&self, value: &str) -> Result<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .map_err(|_| ModelError::UnknownCategory {
                feature: self.feature.clone(),
                value: value.to_string(),
            })
    }

    pub fn decode(&self, code: usize) -> Result<&str> {
        self.classes.get(code).map(String::as_str).ok_or_else(|| {
            ModelError::Numerical {
                message: format!(
                    "code {code} out of range for feature '{}' ({} classes)",
                    self.feature,
                    self.classes.len()
                ),
            }
        })
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Per-domain mapping from categorical-feature name to its encoder.
#[derive(Debug, Clone, Default)]
pub struct EncoderSet {
    encoders: HashMap<String, LabelEncoder>,
}

impl EncoderSet {
    pub fn insert(&mut self, encoder: LabelEncoder) {
        self.encoders.insert(encoder.feature.clone(), encoder);
    }

    pub fn get(&self, feature: &str) -> Option<&LabelEncoder> {
        self.encoders.get(feature)
    }

    /// Encode one value; missing encoder is an internal error, unknown value
    /// is an [`ModelError::UnknownCategory`].
    pub fn encode(&self, feature: &str, value: &str) -> Result<usize> {
        let encoder = self.encoders.get(feature).ok_or_else(|| ModelError::Numerical {
            message: format!("no encoder fitted for feature '{feature}'"),
        })?;
        encoder.encode(value)
    }
}
