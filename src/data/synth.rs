//! Synthetic dataset generation with deterministic labeling rules.
//!
//! Each domain synthesizes its training set from a fixed-seed RNG, so
//! repeated training from a clean process is reproducible. The heuristic
//! label rules are reference behavior, not placeholders: the trained models
//! are expected to recover them, and the tests pin them down.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{CARBON_FLOOR, EsgScores, ProductPick};
use crate::error::{ModelError, Result};

/// Seed shared by all four generators (one fresh RNG per domain).
pub const SYNTH_SEED: u64 = 42;

pub const FRAGILITY_LEVELS: [&str; 3] = ["low", "medium", "high"];
pub const MATERIAL_TYPES: [&str; 4] = ["plastic", "glass", "metal", "organic"];
pub const TRANSPORT_MODES: [&str; 3] = ["ground", "air", "sea"];
pub const LOCATIONS: [&str; 3] = ["urban", "suburban", "rural"];
pub const TRANSPORT_PREFS: [&str; 4] = ["car", "public_transport", "bike", "walk"];
pub const PRODUCT_CATEGORIES: [&str; 5] = ["electronics", "clothing", "food", "home", "beauty"];

/// Feature order shared by the ESG trainer and the engine.
pub const ESG_FEATURES: [&str; 9] = [
    "carbon_emissions",
    "renewable_energy",
    "waste_management",
    "employee_satisfaction",
    "diversity_score",
    "community_impact",
    "board_independence",
    "transparency_score",
    "ethics_score",
];

fn choose(rng: &mut StdRng, items: &[&'static str]) -> &'static str {
    items[rng.gen_range(0..items.len())]
}

#[derive(Debug, Clone)]
pub struct PackagingSample {
    pub weight: f64,
    pub fragility: &'static str,
    pub material: &'static str,
    pub transport: &'static str,
    pub label: &'static str,
}

/// Packaging labeling rule. Rule order matters: the fragility conjunction
/// dominates, then organic material, then the light-item rule.
pub fn packaging_label(weight: f64, fragility: &str, material: &str) -> &'static str {
    if fragility == "high" && weight > 10.0 {
        "reusable_container"
    } else if material == "organic" {
        "biodegradable_plastic"
    } else if weight < 1.0 {
        "minimal_packaging"
    } else {
        "recyclable_cardboard"
    }
}

pub fn gen_packaging_samples(n: usize) -> Vec<PackagingSample> {
    let mut rng = StdRng::seed_from_u64(SYNTH_SEED);
    (0..n)
        .map(|_| {
            let weight = rng.gen_range(0.1..50.0);
            let fragility = choose(&mut rng, &FRAGILITY_LEVELS);
            let material = choose(&mut rng, &MATERIAL_TYPES);
            let transport = choose(&mut rng, &TRANSPORT_MODES);
            PackagingSample {
                weight,
                fragility,
                material,
                transport,
                label: packaging_label(weight, fragility, material),
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct CarbonSample {
    pub age: f64,
    pub income: f64,
    pub location: &'static str,
    pub transport: &'static str,
    pub footprint: f64,
}

/// Deterministic part of the carbon-footprint target (tons CO2/year),
/// before noise and before the floor.
pub fn carbon_base_footprint(age: f64, income: f64, location: &str, transport: &str) -> f64 {
    let mut footprint = 5.0;

    if age > 50.0 {
        footprint += 2.0;
    } else if age < 30.0 {
        footprint += 1.0;
    }

    footprint += (income / 50_000.0) * 3.0;

    footprint += match location {
        "urban" => 1.5,
        "suburban" => 3.0,
        _ => 2.0, // rural
    };

    footprint += match transport {
        "car" => 4.0,
        "public_transport" => 1.0,
        "bike" => -1.0,
        _ => -1.5, // walk
    };

    footprint
}

pub fn gen_carbon_samples(n: usize) -> Result<Vec<CarbonSample>> {
    let mut rng = StdRng::seed_from_u64(SYNTH_SEED);
    let noise = Normal::new(0.0, 0.5).map_err(|e| ModelError::Numerical {
        message: format!("noise distribution: {e}"),
    })?;

    Ok((0..n)
        .map(|_| {
            let age = rng.gen_range(18..80) as f64;
            let income = rng.gen_range(20_000.0..200_000.0);
            let location = choose(&mut rng, &LOCATIONS);
            let transport = choose(&mut rng, &TRANSPORT_PREFS);
            let footprint = (carbon_base_footprint(age, income, location, transport)
                + noise.sample(&mut rng))
            .max(CARBON_FLOOR);
            CarbonSample {
                age,
                income,
                location,
                transport,
                footprint,
            }
        })
        .collect())
}

/// Composite recommendation score: sustainability-weighted with an
/// eco-friendly bonus and a price penalty.
pub fn recommendation_score(sustainability: f64, rating: f64, eco_friendly: bool, price: f64) -> f64 {
    sustainability * 0.4
        + rating * 0.3
        + f64::from(u8::from(eco_friendly)) * 3.0
        + (1000.0 - price) / 100.0 * 0.3
}

/// Synthesize the product catalog. The scored catalog doubles as the
/// recommendation candidate pool after training.
pub fn gen_product_catalog(n: usize) -> Vec<ProductPick> {
    let mut rng = StdRng::seed_from_u64(SYNTH_SEED);
    (0..n)
        .map(|i| {
            let category = choose(&mut rng, &PRODUCT_CATEGORIES);
            let sustainability_score = rng.gen_range(1.0..10.0);
            let price = rng.gen_range(10.0..1000.0);
            let rating = rng.gen_range(1.0..5.0);
            let eco_friendly = rng.gen_range(0..2) == 1;
            ProductPick {
                product_id: i,
                category: category.to_string(),
                sustainability_score,
                price,
                rating,
                eco_friendly,
                recommendation_score: recommendation_score(
                    sustainability_score,
                    rating,
                    eco_friendly,
                    price,
                ),
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct EsgCompany {
    /// Raw metrics in [`ESG_FEATURES`] order.
    pub metrics: [f64; 9],
    pub scores: EsgScores,
}

/// ESG pillar formulas over the nine raw metrics.
pub fn esg_scores_for(metrics: &[f64; 9]) -> EsgScores {
    let [carbon, renewable, waste, satisfaction, diversity, community, independence, transparency, ethics] =
        *metrics;

    let e_score = ((10_000.0 - carbon) / 1000.0 + renewable / 10.0 + waste) / 3.0;
    let s_score = (satisfaction + diversity + community) / 3.0;
    let g_score = (independence / 10.0 + transparency + ethics) / 3.0;
    let overall_esg = (e_score + s_score + g_score) / 3.0;

    EsgScores {
        e_score,
        s_score,
        g_score,
        overall_esg,
    }
}

pub fn gen_esg_companies(n: usize) -> Vec<EsgCompany> {
    let mut rng = StdRng::seed_from_u64(SYNTH_SEED);
    (0..n)
        .map(|_| {
            let metrics = [
                rng.gen_range(100.0..10_000.0),  // carbon_emissions
                rng.gen_range(0.0..100.0),       // renewable_energy
                rng.gen_range(1.0..10.0),        // waste_management
                rng.gen_range(1.0..10.0),        // employee_satisfaction
                rng.gen_range(1.0..10.0),        // diversity_score
                rng.gen_range(1.0..10.0),        // community_impact
                rng.gen_range(0.0..100.0),       // board_independence
                rng.gen_range(1.0..10.0),        // transparency_score
                rng.gen_range(1.0..10.0),        // ethics_score
            ];
            EsgCompany {
                metrics,
                scores: esg_scores_for(&metrics),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packaging_rule_order_matches_reference() {
        assert_eq!(packaging_label(12.0, "high", "organic"), "reusable_container");
        assert_eq!(packaging_label(0.5, "low", "organic"), "biodegradable_plastic");
        assert_eq!(packaging_label(0.5, "low", "plastic"), "minimal_packaging");
        assert_eq!(packaging_label(5.0, "medium", "glass"), "recyclable_cardboard");
        // Heavy but not fragile: falls through to cardboard.
        assert_eq!(packaging_label(30.0, "low", "metal"), "recyclable_cardboard");
    }

    #[test]
    fn carbon_formula_matches_reference_example() {
        // age 55 (+2), income 100k (+6), suburban (+3), car (+4), base 5.
        let v = carbon_base_footprint(55.0, 100_000.0, "suburban", "car");
        assert!((v - 20.0).abs() < 1e-12);
    }

    #[test]
    fn generation_is_deterministic_across_calls() {
        let a = gen_packaging_samples(50);
        let b = gen_packaging_samples(50);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.weight.to_bits(), y.weight.to_bits());
            assert_eq!(x.label, y.label);
        }

        let c1 = gen_carbon_samples(50).unwrap();
        let c2 = gen_carbon_samples(50).unwrap();
        for (x, y) in c1.iter().zip(c2.iter()) {
            assert_eq!(x.footprint.to_bits(), y.footprint.to_bits());
        }
    }

    #[test]
    fn generated_values_stay_in_range() {
        for s in gen_packaging_samples(200) {
            assert!(s.weight >= 0.1 && s.weight < 50.0);
            assert!(FRAGILITY_LEVELS.contains(&s.fragility));
            assert!(MATERIAL_TYPES.contains(&s.material));
            assert!(TRANSPORT_MODES.contains(&s.transport));
        }
        for s in gen_carbon_samples(200).unwrap() {
            assert!(s.age >= 18.0 && s.age < 80.0);
            assert!(s.income >= 20_000.0 && s.income < 200_000.0);
            assert!(s.footprint >= CARBON_FLOOR);
        }
        for p in gen_product_catalog(200) {
            assert!(p.price >= 10.0 && p.price < 1000.0);
            assert!(p.rating >= 1.0 && p.rating < 5.0);
        }
    }

    #[test]
    fn esg_formulas_match_reference() {
        let metrics = [5000.0, 30.0, 5.0, 7.0, 6.0, 6.0, 60.0, 7.0, 7.0];
        let s = esg_scores_for(&metrics);
        assert!((s.e_score - (5.0 + 3.0 + 5.0) / 3.0).abs() < 1e-12);
        assert!((s.s_score - 19.0 / 3.0).abs() < 1e-12);
        assert!((s.g_score - 20.0 / 3.0).abs() < 1e-12);
        assert!((s.overall_esg - (s.e_score + s.s_score + s.g_score) / 3.0).abs() < 1e-12);
    }
}
