//! The four domain trainers.
//!
//! Each trainer: synthesize a labeled dataset (fixed seed), fit encoders and
//! scalers on exactly that dataset, fit the model(s), and return the bundled
//! artifact. Failures surface as `ModelError::Training`; the store converts
//! them into `DomainStatus::Error` without touching any previous artifact.

use nalgebra::{DMatrix, DVector};
use tracing::info;

use crate::data::synth::{self, ESG_FEATURES};
use crate::domain::Domain;
use crate::error::{ModelError, Result};
use crate::features::{EncoderSet, LabelEncoder, ScalerState};
use crate::models::{DecisionTree, LinearModel, TreeParams};
use crate::train::artifacts::{
    CarbonArtifact, DomainArtifact, EsgArtifact, PackagingArtifact, ProductArtifact,
};

const PACKAGING_SAMPLES: usize = 1000;
const CARBON_SAMPLES: usize = 1000;
const PRODUCT_SAMPLES: usize = 500;
const ESG_SAMPLES: usize = 300;

/// Train one domain from scratch.
pub fn train_domain(domain: Domain) -> Result<DomainArtifact> {
    let wrap = |e: ModelError| match e {
        err @ ModelError::Training { .. } => err,
        other => ModelError::Training {
            domain,
            message: other.to_string(),
        },
    };

    let artifact = match domain {
        Domain::Packaging => train_packaging().map(DomainArtifact::Packaging),
        Domain::CarbonFootprint => train_carbon().map(DomainArtifact::CarbonFootprint),
        Domain::ProductRecommendation => train_products().map(DomainArtifact::ProductRecommendation),
        Domain::EsgScore => train_esg().map(DomainArtifact::EsgScore),
    }
    .map_err(wrap)?;

    info!(domain = %domain, "model trained");
    Ok(artifact)
}

fn train_packaging() -> Result<PackagingArtifact> {
    let samples = synth::gen_packaging_samples(PACKAGING_SAMPLES);

    let mut encoders = EncoderSet::default();
    let fragility: Vec<&str> = samples.iter().map(|s| s.fragility).collect();
    let material: Vec<&str> = samples.iter().map(|s| s.material).collect();
    let transport: Vec<&str> = samples.iter().map(|s| s.transport).collect();
    encoders.insert(LabelEncoder::fit("fragility", &fragility));
    encoders.insert(LabelEncoder::fit("material_type", &material));
    encoders.insert(LabelEncoder::fit("transport_mode", &transport));

    let observed_labels: Vec<&str> = samples.iter().map(|s| s.label).collect();
    let labels = LabelEncoder::fit("packaging_type", &observed_labels);

    let mut x = Vec::with_capacity(samples.len());
    let mut y = Vec::with_capacity(samples.len());
    for s in &samples {
        x.push(vec![
            s.weight,
            encoders.encode("fragility", s.fragility)? as f64,
            encoders.encode("material_type", s.material)? as f64,
            encoders.encode("transport_mode", s.transport)? as f64,
        ]);
        y.push(labels.encode(s.label)?);
    }

    let tree = DecisionTree::fit(&x, &y, labels.len(), &TreeParams::default())?;
    Ok(PackagingArtifact {
        tree,
        encoders,
        labels,
    })
}

fn train_carbon() -> Result<CarbonArtifact> {
    let samples = synth::gen_carbon_samples(CARBON_SAMPLES)?;

    let mut encoders = EncoderSet::default();
    let locations: Vec<&str> = samples.iter().map(|s| s.location).collect();
    let transports: Vec<&str> = samples.iter().map(|s| s.transport).collect();
    encoders.insert(LabelEncoder::fit("location", &locations));
    encoders.insert(LabelEncoder::fit("transport_preference", &transports));

    let n_locations = encoders.get("location").map(|e| e.len()).unwrap_or(0);
    let n_transports = encoders
        .get("transport_preference")
        .map(|e| e.len())
        .unwrap_or(0);
    let width = 2 + n_locations + n_transports;

    let mut raw = Vec::with_capacity(samples.len() * width);
    let mut targets = Vec::with_capacity(samples.len());
    for s in &samples {
        let loc = encoders.encode("location", s.location)?;
        let pref = encoders.encode("transport_preference", s.transport)?;
        raw.extend(CarbonArtifact::raw_features(
            s.age,
            s.income,
            loc,
            n_locations,
            pref,
            n_transports,
        ));
        targets.push(s.footprint);
    }

    let raw = DMatrix::from_row_slice(samples.len(), width, &raw);
    let scaler = ScalerState::fit(&raw)?;
    let scaled = scaler.transform_matrix(&raw)?;
    let design = scaled.insert_column(0, 1.0);

    let model = LinearModel::fit(&design, &DVector::from_vec(targets))?;
    Ok(CarbonArtifact {
        model,
        encoders,
        scaler,
        n_locations,
        n_transports,
    })
}

fn train_products() -> Result<ProductArtifact> {
    let catalog = synth::gen_product_catalog(PRODUCT_SAMPLES);

    let mut encoders = EncoderSet::default();
    let categories: Vec<&str> = catalog.iter().map(|p| p.category.as_str()).collect();
    encoders.insert(LabelEncoder::fit("category", &categories));
    let n_categories = encoders.get("category").map(|e| e.len()).unwrap_or(0);

    let width = 5 + n_categories;
    let mut rows = Vec::with_capacity(catalog.len() * width);
    let mut targets = Vec::with_capacity(catalog.len());
    for p in &catalog {
        let code = encoders.encode("category", &p.category)?;
        rows.extend(ProductArtifact::raw_design(
            code,
            n_categories,
            p.sustainability_score,
            p.price,
            p.rating,
            p.eco_friendly,
        ));
        targets.push(p.recommendation_score);
    }

    let design = DMatrix::from_row_slice(catalog.len(), width, &rows);
    let model = LinearModel::fit(&design, &DVector::from_vec(targets))?;
    Ok(ProductArtifact {
        model,
        encoders,
        catalog,
        n_categories,
    })
}

fn train_esg() -> Result<EsgArtifact> {
    let companies = synth::gen_esg_companies(ESG_SAMPLES);

    let mut raw = Vec::with_capacity(companies.len() * ESG_FEATURES.len());
    for c in &companies {
        raw.extend_from_slice(&c.metrics);
    }
    let raw = DMatrix::from_row_slice(companies.len(), ESG_FEATURES.len(), &raw);

    let scaler = ScalerState::fit(&raw)?;
    let design = scaler.transform_matrix(&raw)?.insert_column(0, 1.0);

    let fit_target = |select: fn(&crate::domain::EsgScores) -> f64| -> Result<LinearModel> {
        let targets: Vec<f64> = companies.iter().map(|c| select(&c.scores)).collect();
        LinearModel::fit(&design, &DVector::from_vec(targets))
    };

    Ok(EsgArtifact {
        scaler,
        e_model: fit_target(|s| s.e_score)?,
        s_model: fit_target(|s| s.s_score)?,
        g_model: fit_target(|s| s.g_score)?,
        overall_model: fit_target(|s| s.overall_esg)?,
    })
}
