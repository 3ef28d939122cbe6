//! Trained per-domain artifacts.
//!
//! An artifact bundles everything inference needs for one domain: the model
//! itself, the categorical encoders fitted on the training vocabulary, and
//! (where the domain scales) the scaler state. Artifacts are immutable and
//! replaced wholesale on retrain.

use crate::data::synth::ESG_FEATURES;
use crate::domain::{CARBON_FLOOR, Domain, EsgScores, ProductPick};
use crate::error::Result;
use crate::features::{EncoderSet, ScalerState};
use crate::models::{DecisionTree, LinearModel};

/// Packaging classifier: tree over [weight, fragility, material, transport]
/// codes, plus the label encoder for decoding the predicted class.
#[derive(Debug, Clone)]
pub struct PackagingArtifact {
    pub tree: DecisionTree,
    pub encoders: EncoderSet,
    pub labels: crate::features::LabelEncoder,
}

impl PackagingArtifact {
    /// Encode, classify, decode. Unknown categories error here; the engine
    /// decides whether that becomes a fallback label.
    pub fn predict_label(
        &self,
        weight: f64,
        fragility: &str,
        material: &str,
        transport: &str,
    ) -> Result<String> {
        let f = self.encoders.encode("fragility", fragility)? as f64;
        let m = self.encoders.encode("material_type", material)? as f64;
        let t = self.encoders.encode("transport_mode", transport)? as f64;
        let class = self.tree.predict(&[weight, f, m, t])?;
        Ok(self.labels.decode(class)?.to_string())
    }
}

/// Expand a categorical code into a one-hot block appended to `out`.
pub(crate) fn push_one_hot(out: &mut Vec<f64>, code: usize, cardinality: usize) {
    for i in 0..cardinality {
        out.push(if i == code { 1.0 } else { 0.0 });
    }
}

/// Carbon-footprint regressor over a standardized design of
/// [age, income, one-hot(location), one-hot(transport_preference)].
#[derive(Debug, Clone)]
pub struct CarbonArtifact {
    pub model: LinearModel,
    pub encoders: EncoderSet,
    pub scaler: ScalerState,
    pub n_locations: usize,
    pub n_transports: usize,
}

impl CarbonArtifact {
    pub(crate) fn raw_features(
        age: f64,
        income: f64,
        location_code: usize,
        n_locations: usize,
        transport_code: usize,
        n_transports: usize,
    ) -> Vec<f64> {
        let mut out = Vec::with_capacity(2 + n_locations + n_transports);
        out.push(age);
        out.push(income);
        push_one_hot(&mut out, location_code, n_locations);
        push_one_hot(&mut out, transport_code, n_transports);
        out
    }

    /// Predicted tons CO2/year, floored at [`CARBON_FLOOR`].
    pub fn predict_total(
        &self,
        age: f64,
        income: f64,
        location: &str,
        transport: &str,
    ) -> Result<f64> {
        let loc = self.encoders.encode("location", location)?;
        let pref = self.encoders.encode("transport_preference", transport)?;

        let mut features =
            Self::raw_features(age, income, loc, self.n_locations, pref, self.n_transports);
        self.scaler.transform(&mut features)?;

        let mut design = Vec::with_capacity(1 + features.len());
        design.push(1.0);
        design.extend_from_slice(&features);

        Ok(self.model.predict(&design)?.max(CARBON_FLOOR))
    }
}

/// Product-recommendation artifact: the scoring regressor plus the scored
/// catalog that serves as the candidate pool.
#[derive(Debug, Clone)]
pub struct ProductArtifact {
    pub model: LinearModel,
    pub encoders: EncoderSet,
    pub catalog: Vec<ProductPick>,
    pub n_categories: usize,
}

impl ProductArtifact {
    pub(crate) fn raw_design(
        category_code: usize,
        n_categories: usize,
        sustainability: f64,
        price: f64,
        rating: f64,
        eco_friendly: bool,
    ) -> Vec<f64> {
        let mut out = Vec::with_capacity(5 + n_categories);
        out.push(1.0);
        push_one_hot(&mut out, category_code, n_categories);
        out.push(sustainability);
        out.push(price);
        out.push(rating);
        out.push(f64::from(u8::from(eco_friendly)));
        out
    }

    /// Model-predicted recommendation score for an arbitrary product.
    pub fn score(
        &self,
        category: &str,
        sustainability: f64,
        price: f64,
        rating: f64,
        eco_friendly: bool,
    ) -> Result<f64> {
        let code = self.encoders.encode("category", category)?;
        let design =
            Self::raw_design(code, self.n_categories, sustainability, price, rating, eco_friendly);
        self.model.predict(&design)
    }

    /// Top candidates from the pool: category match, price within budget,
    /// optionally eco-friendly only, descending precomputed score, at most 5.
    ///
    /// An unknown category simply matches nothing (pool-filter semantics).
    pub fn recommend(&self, category: &str, budget: f64, eco_only: bool) -> Vec<ProductPick> {
        let mut picks: Vec<ProductPick> = self
            .catalog
            .iter()
            .filter(|p| p.category == category && p.price <= budget)
            .filter(|p| !eco_only || p.eco_friendly)
            .cloned()
            .collect();
        picks.sort_by(|a, b| {
            b.recommendation_score
                .partial_cmp(&a.recommendation_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        picks.truncate(5);
        picks
    }
}

/// Four related regressors sharing one standardized feature vector.
#[derive(Debug, Clone)]
pub struct EsgArtifact {
    pub scaler: ScalerState,
    pub e_model: LinearModel,
    pub s_model: LinearModel,
    pub g_model: LinearModel,
    pub overall_model: LinearModel,
}

impl EsgArtifact {
    /// Predict all four scores from raw metrics in [`ESG_FEATURES`] order,
    /// each floored at 0.
    pub fn predict(&self, metrics: &[f64; 9]) -> Result<EsgScores> {
        debug_assert_eq!(self.scaler.n_features(), ESG_FEATURES.len());

        let mut features = metrics.to_vec();
        self.scaler.transform(&mut features)?;

        let mut design = Vec::with_capacity(1 + features.len());
        design.push(1.0);
        design.extend_from_slice(&features);

        Ok(EsgScores {
            e_score: self.e_model.predict(&design)?.max(0.0),
            s_score: self.s_model.predict(&design)?.max(0.0),
            g_score: self.g_model.predict(&design)?.max(0.0),
            overall_esg: self.overall_model.predict(&design)?.max(0.0),
        })
    }
}

/// The trained predictor(s) for one domain.
#[derive(Debug, Clone)]
pub enum DomainArtifact {
    Packaging(PackagingArtifact),
    CarbonFootprint(CarbonArtifact),
    ProductRecommendation(ProductArtifact),
    EsgScore(EsgArtifact),
}

impl DomainArtifact {
    pub fn domain(&self) -> Domain {
        match self {
            DomainArtifact::Packaging(_) => Domain::Packaging,
            DomainArtifact::CarbonFootprint(_) => Domain::CarbonFootprint,
            DomainArtifact::ProductRecommendation(_) => Domain::ProductRecommendation,
            DomainArtifact::EsgScore(_) => Domain::EsgScore,
        }
    }
}
