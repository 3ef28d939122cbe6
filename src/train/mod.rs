//! Per-domain training: synthesis, feature fitting, model fitting.
//!
//! Each trainer is a pure function from nothing (the synthetic seed is
//! fixed) to a published artifact. Trainers never touch the store directly;
//! the store invokes them and owns publication.

pub mod artifacts;
pub mod trainers;

pub use artifacts::{
    CarbonArtifact, DomainArtifact, EsgArtifact, PackagingArtifact, ProductArtifact,
};
pub use trainers::train_domain;
