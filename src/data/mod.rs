//! Synthetic training data.

pub mod synth;

pub use synth::{
    CarbonSample, EsgCompany, PackagingSample, carbon_base_footprint, esg_scores_for,
    gen_carbon_samples, gen_esg_companies, gen_packaging_samples, gen_product_catalog,
    packaging_label, recommendation_score,
};
