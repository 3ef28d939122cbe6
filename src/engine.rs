//! Per-domain prediction over a shared [`ModelStore`].
//!
//! Every prediction follows the same shape: ensure the domain is trained,
//! pull typed fields out of the record, encode/scale through the artifact,
//! and decode a domain-shaped result. Unavailable models and unknown
//! categories are substituted with fixed fallback values by default — parity
//! with the reference behavior — unless `strict_unknowns` is set, in which
//! case the underlying error propagates to the caller.

use std::sync::Arc;

use rand::Rng;
use tracing::warn;

use crate::domain::fields::{optional_bool, optional_f64, optional_str, require_f64, require_str};
use crate::domain::{
    CARBON_FALLBACK, CARBON_UNIT, CarbonBreakdown, CarbonPrediction, Domain, ESG_FALLBACK,
    EsgScores, PACKAGING_FALLBACK, PackagingPrediction, Prediction, ProductPick, Record,
};
use crate::error::{ModelError, Result};
use crate::store::ModelStore;
use crate::train::DomainArtifact;

/// Engine behavior switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    /// When set, an unknown category or unavailable model is an error
    /// instead of a silent fallback constant. Off by default for parity
    /// with the reference behavior.
    pub strict_unknowns: bool,
}

pub struct PredictionEngine {
    store: Arc<ModelStore>,
    config: EngineConfig,
}

impl PredictionEngine {
    pub fn new(store: Arc<ModelStore>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: Arc<ModelStore>, config: EngineConfig) -> Self {
        PredictionEngine { store, config }
    }

    pub fn store(&self) -> &Arc<ModelStore> {
        &self.store
    }

    /// Dispatch a single-record prediction by domain.
    pub fn predict(&self, domain: Domain, record: &Record) -> Result<Prediction> {
        if record.is_empty() {
            return Err(ModelError::EmptyInput);
        }
        match domain {
            Domain::Packaging => self.predict_packaging(record).map(Prediction::Packaging),
            Domain::CarbonFootprint => self
                .predict_carbon(record)
                .map(Prediction::CarbonFootprint),
            Domain::ProductRecommendation => {
                self.recommend_products(record).map(|recommendations| {
                    let count = recommendations.len();
                    Prediction::ProductRecommendation {
                        recommendations,
                        count,
                    }
                })
            }
            Domain::EsgScore => self.predict_esg(record).map(Prediction::EsgScore),
        }
    }

    /// Whether an error is eligible for the fallback policy: encoding
    /// failures and missing models fall back; malformed requests do not.
    fn recoverable(err: &ModelError) -> bool {
        matches!(
            err,
            ModelError::UnknownCategory { .. } | ModelError::NotTrained { .. }
        )
    }

    fn recover<T>(&self, domain: Domain, result: Result<T>, fallback: impl FnOnce() -> T) -> Result<T> {
        match result {
            Ok(v) => Ok(v),
            Err(err) if Self::recoverable(&err) && !self.config.strict_unknowns => {
                warn!(domain = %domain, error = %err, "substituting fallback prediction");
                Ok(fallback())
            }
            Err(err) => Err(err),
        }
    }

    fn artifact(&self, domain: Domain) -> Result<Arc<DomainArtifact>> {
        self.store.ensure_trained(domain);
        self.store
            .artifact(domain)
            .ok_or(ModelError::NotTrained { domain })
    }

    pub fn predict_packaging(&self, record: &Record) -> Result<PackagingPrediction> {
        let label = self.recover(Domain::Packaging, self.packaging_label(record), || {
            PACKAGING_FALLBACK.to_string()
        })?;
        Ok(PackagingPrediction {
            packaging_type: label,
            confidence: self.confidence(),
        })
    }

    fn packaging_label(&self, record: &Record) -> Result<String> {
        // Single-record payloads commonly abbreviate `product_weight` to
        // `weight`; accept both spellings.
        let weight = require_f64(record, "product_weight").or_else(|_| require_f64(record, "weight"))?;
        let fragility = require_str(record, "fragility")?;
        let material = require_str(record, "material_type")?;
        let transport = require_str(record, "transport_mode")?;

        match self.artifact(Domain::Packaging)?.as_ref() {
            DomainArtifact::Packaging(artifact) => {
                artifact.predict_label(weight, &fragility, &material, &transport)
            }
            _ => unreachable!("store returned a foreign artifact"),
        }
    }

    pub fn predict_carbon(&self, record: &Record) -> Result<CarbonPrediction> {
        let total = self.recover(
            Domain::CarbonFootprint,
            self.carbon_total(record),
            || CARBON_FALLBACK,
        )?;
        Ok(CarbonPrediction {
            total,
            breakdown: CarbonBreakdown::from_total(total),
            unit: CARBON_UNIT.to_string(),
        })
    }

    fn carbon_total(&self, record: &Record) -> Result<f64> {
        let age = require_f64(record, "age")?;
        let income = require_f64(record, "income")?;
        let location = require_str(record, "location")?;
        let transport = require_str(record, "transport_preference")?;

        match self.artifact(Domain::CarbonFootprint)?.as_ref() {
            DomainArtifact::CarbonFootprint(artifact) => {
                artifact.predict_total(age, income, &location, &transport)
            }
            _ => unreachable!("store returned a foreign artifact"),
        }
    }

    pub fn recommend_products(&self, record: &Record) -> Result<Vec<ProductPick>> {
        let category = optional_str(record, "category", "electronics");
        let budget = optional_f64(record, "budget", 500.0)?;
        let eco_priority = optional_bool(record, "eco_priority", true);

        let result = self.artifact(Domain::ProductRecommendation).map(|artifact| {
            match artifact.as_ref() {
                DomainArtifact::ProductRecommendation(a) => {
                    a.recommend(&category, budget, eco_priority)
                }
                _ => unreachable!("store returned a foreign artifact"),
            }
        });
        self.recover(Domain::ProductRecommendation, result, Vec::new)
    }

    pub fn predict_esg(&self, record: &Record) -> Result<EsgScores> {
        let metrics = [
            optional_f64(record, "carbon_emissions", 5000.0)?,
            optional_f64(record, "renewable_energy", 30.0)?,
            optional_f64(record, "waste_management", 5.0)?,
            optional_f64(record, "employee_satisfaction", 7.0)?,
            optional_f64(record, "diversity_score", 6.0)?,
            optional_f64(record, "community_impact", 6.0)?,
            optional_f64(record, "board_independence", 60.0)?,
            optional_f64(record, "transparency_score", 7.0)?,
            optional_f64(record, "ethics_score", 7.0)?,
        ];

        let result = self
            .artifact(Domain::EsgScore)
            .and_then(|artifact| match artifact.as_ref() {
                DomainArtifact::EsgScore(a) => a.predict(&metrics),
                _ => unreachable!("store returned a foreign artifact"),
            });
        self.recover(Domain::EsgScore, result, || EsgScores {
            e_score: ESG_FALLBACK,
            s_score: ESG_FALLBACK,
            g_score: ESG_FALLBACK,
            overall_esg: ESG_FALLBACK,
        })
    }

    /// Placeholder confidence in [0.7, 0.95].
    ///
    /// Deliberately NOT derived from model internals; the reference system
    /// ships the same stub and downstream consumers expect the field.
    pub fn confidence(&self) -> f64 {
        rand::thread_rng().gen_range(0.7..=0.95)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::OnceLock;

    fn shared_store() -> Arc<ModelStore> {
        static STORE: OnceLock<Arc<ModelStore>> = OnceLock::new();
        STORE
            .get_or_init(|| Arc::new(ModelStore::with_eager_training()))
            .clone()
    }

    fn engine() -> PredictionEngine {
        PredictionEngine::new(shared_store())
    }

    fn strict_engine() -> PredictionEngine {
        PredictionEngine::with_config(
            shared_store(),
            EngineConfig {
                strict_unknowns: true,
            },
        )
    }

    fn record(pairs: &[(&str, serde_json::Value)]) -> Record {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn organic_material_rule_dominates_for_light_items() {
        let rec = record(&[
            ("weight", json!(0.5)),
            ("fragility", json!("low")),
            ("material_type", json!("organic")),
            ("transport_mode", json!("ground")),
        ]);
        let p = engine().predict_packaging(&rec).unwrap();
        assert_eq!(p.packaging_type, "biodegradable_plastic");
        assert!((0.7..=0.95).contains(&p.confidence));
    }

    #[test]
    fn carbon_example_scenario_lands_near_the_formula() {
        let rec = record(&[
            ("age", json!(55)),
            ("income", json!(100_000)),
            ("location", json!("suburban")),
            ("transport_preference", json!("car")),
        ]);
        let p = engine().predict_carbon(&rec).unwrap();
        assert!(
            (p.total - 20.0).abs() < 2.0,
            "expected ~20 tons, got {:.2}",
            p.total
        );
        assert_eq!(p.unit, CARBON_UNIT);
        assert!((p.breakdown.sum() - p.total).abs() < 1e-9);
    }

    #[test]
    fn carbon_prediction_never_dips_below_the_floor() {
        let eng = engine();
        let frugal_profiles = [
            (18, 20_000, "rural", "walk"),
            (80, 20_000, "urban", "bike"),
            (30, 20_000, "rural", "bike"),
        ];
        for (age, income, location, transport) in frugal_profiles {
            let rec = record(&[
                ("age", json!(age)),
                ("income", json!(income)),
                ("location", json!(location)),
                ("transport_preference", json!(transport)),
            ]);
            let p = eng.predict_carbon(&rec).unwrap();
            assert!(p.total >= 0.5, "{location}/{transport}: {}", p.total);
        }
    }

    #[test]
    fn esg_scores_are_never_negative() {
        let rec = record(&[
            ("carbon_emissions", json!(9990.0)),
            ("renewable_energy", json!(0.0)),
            ("waste_management", json!(1.0)),
        ]);
        let s = engine().predict_esg(&rec).unwrap();
        for v in [s.e_score, s.s_score, s.g_score, s.overall_esg] {
            assert!(v >= 0.0, "negative sub-score: {v}");
        }
    }

    #[test]
    fn recommendations_respect_budget_count_and_eco_filter() {
        let rec = record(&[
            ("category", json!("electronics")),
            ("budget", json!(600)),
            ("eco_priority", json!(true)),
        ]);
        let picks = engine().recommend_products(&rec).unwrap();
        assert!(picks.len() <= 5);
        assert!(!picks.is_empty(), "catalog should have eco electronics under 600");
        for p in &picks {
            assert_eq!(p.category, "electronics");
            assert!(p.price <= 600.0);
            assert!(p.eco_friendly);
        }
        // Descending by score.
        for w in picks.windows(2) {
            assert!(w[0].recommendation_score >= w[1].recommendation_score);
        }
    }

    #[test]
    fn unknown_product_category_yields_an_empty_list() {
        let rec = record(&[("category", json!("spacecraft")), ("budget", json!(900))]);
        assert!(engine().recommend_products(&rec).unwrap().is_empty());
    }

    #[test]
    fn unknown_fragility_falls_back_to_cardboard() {
        let rec = record(&[
            ("weight", json!(3.0)),
            ("fragility", json!("indestructible")),
            ("material_type", json!("metal")),
            ("transport_mode", json!("sea")),
        ]);
        let p = engine().predict_packaging(&rec).unwrap();
        assert_eq!(p.packaging_type, PACKAGING_FALLBACK);
    }

    #[test]
    fn unknown_location_falls_back_to_average_footprint() {
        let rec = record(&[
            ("age", json!(40)),
            ("income", json!(50_000)),
            ("location", json!("orbital")),
            ("transport_preference", json!("car")),
        ]);
        let p = engine().predict_carbon(&rec).unwrap();
        assert_eq!(p.total, CARBON_FALLBACK);
        assert!((p.breakdown.sum() - CARBON_FALLBACK).abs() < 1e-9);
    }

    #[test]
    fn strict_mode_surfaces_unknown_categories() {
        let rec = record(&[
            ("weight", json!(3.0)),
            ("fragility", json!("indestructible")),
            ("material_type", json!("metal")),
            ("transport_mode", json!("sea")),
        ]);
        let err = strict_engine().predict_packaging(&rec).unwrap_err();
        assert!(matches!(err, ModelError::UnknownCategory { .. }));
    }

    #[test]
    fn empty_record_is_rejected_for_every_domain() {
        let eng = engine();
        for domain in Domain::ALL {
            let err = eng.predict(domain, &Record::new()).unwrap_err();
            assert!(matches!(err, ModelError::EmptyInput), "{domain}");
        }
    }

    #[test]
    fn predict_dispatch_produces_domain_shaped_results() {
        let eng = engine();
        let rec = record(&[
            ("carbon_emissions", json!(3000.0)),
            ("renewable_energy", json!(60.0)),
            ("waste_management", json!(8.0)),
        ]);
        match eng.predict(Domain::EsgScore, &rec).unwrap() {
            Prediction::EsgScore(s) => assert!(s.overall_esg > 0.0),
            other => panic!("wrong shape: {other:?}"),
        }
    }
}
