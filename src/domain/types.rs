//! Domains, statuses, input records, and prediction result shapes.
//!
//! These types are intentionally lightweight and serializable so they can be:
//!
//! - passed across the engine boundary by the CLI (or a web layer)
//! - exported to JSON for batch result payloads
//! - compared in tests

use std::collections::BTreeMap;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One of the four prediction subject-areas. Each has its own model
/// artifact(s), encoders, and fallback constants; domains are fully
/// independent of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Domain {
    Packaging,
    CarbonFootprint,
    ProductRecommendation,
    EsgScore,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Packaging,
        Domain::CarbonFootprint,
        Domain::ProductRecommendation,
        Domain::EsgScore,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Packaging => "packaging",
            Domain::CarbonFootprint => "carbon_footprint",
            Domain::ProductRecommendation => "product_recommendation",
            Domain::EsgScore => "esg_score",
        }
    }

    /// Index into per-domain slot arrays.
    pub(crate) fn index(self) -> usize {
        match self {
            Domain::Packaging => 0,
            Domain::CarbonFootprint => 1,
            Domain::ProductRecommendation => 2,
            Domain::EsgScore => 3,
        }
    }

    /// Columns a batch table must contain for this domain.
    ///
    /// Optional columns (`eco_priority`, the six defaulted ESG fields) are
    /// deliberately not listed; their absence is handled per row.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            Domain::Packaging => &["product_weight", "fragility", "material_type", "transport_mode"],
            Domain::CarbonFootprint => &["age", "income", "location", "transport_preference"],
            Domain::ProductRecommendation => &["category", "budget"],
            Domain::EsgScore => &["carbon_emissions", "renewable_energy", "waste_management"],
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-domain training lifecycle state.
///
/// `Error` means the most recent training attempt failed; a previously
/// published artifact (if any) is still available for prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainStatus {
    NotTrained,
    Trained,
    Error,
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DomainStatus::NotTrained => "not_trained",
            DomainStatus::Trained => "trained",
            DomainStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// A single untyped input record: field name -> JSON value.
///
/// Single predictions arrive as JSON objects; batch rows arrive as CSV cells
/// (strings). The coercion helpers in [`crate::domain::fields`] accept both.
pub type Record = BTreeMap<String, serde_json::Value>;

/// Packaging suggestion for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackagingPrediction {
    pub packaging_type: String,
    /// Placeholder confidence in [0.7, 0.95]; not derived from the model.
    pub confidence: f64,
}

/// Split of a carbon-footprint total into fixed activity shares.
///
/// The five fractions sum to 1.0, so the breakdown always accounts for 100%
/// of the predicted total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonBreakdown {
    pub transport: f64,
    pub housing: f64,
    pub food: f64,
    pub consumption: f64,
    pub other: f64,
}

impl CarbonBreakdown {
    pub const SHARES: [(&'static str, f64); 5] = [
        ("transport", 0.30),
        ("housing", 0.25),
        ("food", 0.20),
        ("consumption", 0.15),
        ("other", 0.10),
    ];

    pub fn from_total(total: f64) -> Self {
        CarbonBreakdown {
            transport: total * 0.30,
            housing: total * 0.25,
            food: total * 0.20,
            consumption: total * 0.15,
            other: total * 0.10,
        }
    }

    pub fn sum(&self) -> f64 {
        self.transport + self.housing + self.food + self.consumption + self.other
    }
}

/// Carbon footprint estimate for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonPrediction {
    /// Tons CO2 per year, never below [`CARBON_FLOOR`].
    pub total: f64,
    pub breakdown: CarbonBreakdown,
    pub unit: String,
}

/// One recommended product from the candidate pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPick {
    pub product_id: usize,
    pub category: String,
    pub sustainability_score: f64,
    pub price: f64,
    pub rating: f64,
    pub eco_friendly: bool,
    pub recommendation_score: f64,
}

/// ESG sub-scores plus the overall score, each floored at 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsgScores {
    pub e_score: f64,
    pub s_score: f64,
    pub g_score: f64,
    pub overall_esg: f64,
}

/// A domain-shaped prediction result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "domain", rename_all = "snake_case")]
pub enum Prediction {
    Packaging(PackagingPrediction),
    CarbonFootprint(CarbonPrediction),
    ProductRecommendation { recommendations: Vec<ProductPick>, count: usize },
    EsgScore(EsgScores),
}

/// Minimum carbon footprint in tons CO2/year.
pub const CARBON_FLOOR: f64 = 0.5;

/// Unit label attached to carbon predictions.
pub const CARBON_UNIT: &str = "tons CO2/year";

/// Fallback label when packaging inputs cannot be encoded.
pub const PACKAGING_FALLBACK: &str = "recyclable_cardboard";

/// Fallback carbon total (average footprint) when inputs cannot be encoded.
pub const CARBON_FALLBACK: f64 = 8.5;

/// Fallback value for every ESG sub-score when prediction is impossible.
pub const ESG_FALLBACK: f64 = 5.0;
