//! Fixtures for the carprice benchmarks.
//!
//! Builds forests of a chosen size without a training run, so latency can be
//! measured against artifacts shaped like production ones (hundreds of deep
//! trees) rather than test-sized ones.

use carprice::{
    encoding::LabelEncoder,
    model::{RandomForestParams, RandomForestRegressor, TreeNode},
    schema::N_FEATURES,
    Artifact, CategoricalField, EncoderSet, FeatureRow, InferenceModel, Result,
};
use std::collections::BTreeMap;

/// Split thresholds per column, roughly mid-range for the real inputs.
const THRESHOLDS: [f64; N_FEATURES] = [40.5, 2.5, 2015.5, 60_000.0, 1_400.0, 0.5, 0.5];

/// Complete binary tree of `depth` levels in pre-order.
fn complete_tree(depth: usize, seed: usize, nodes: &mut Vec<TreeNode>) {
    let idx = nodes.len();
    if depth == 0 {
        nodes.push(TreeNode::Leaf {
            value: 1.0 + ((seed * 7919 + idx * 104_729) % 2_000) as f64 / 100.0,
        });
        return;
    }
    let feature = (seed + idx) % N_FEATURES;
    nodes.push(TreeNode::Leaf { value: 0.0 });
    let left = nodes.len();
    complete_tree(depth - 1, seed, nodes);
    let right = nodes.len();
    complete_tree(depth - 1, seed, nodes);
    nodes[idx] = TreeNode::Split {
        feature,
        threshold: THRESHOLDS[feature],
        left,
        right,
    };
}

/// Synthetic forest with `n_trees` trees of the given depth.
pub fn synthetic_forest(n_trees: usize, depth: usize) -> Result<RandomForestRegressor> {
    let trees = (0..n_trees)
        .map(|seed| {
            let mut nodes = Vec::with_capacity((1 << (depth + 1)) - 1);
            complete_tree(depth, seed, &mut nodes);
            nodes
        })
        .collect();
    RandomForestRegressor::from_params(RandomForestParams {
        n_features: N_FEATURES,
        trees,
    })
}

/// Encoders with `n_brands` brand labels and a few cities.
pub fn synthetic_encoders(n_brands: usize) -> Result<EncoderSet> {
    let brands: Vec<String> = (0..n_brands).map(|i| format!("Brand {:04}", i)).collect();
    let labels = [
        (CategoricalField::BrandModel, brands),
        (
            CategoricalField::City,
            ["Bangalore", "Chennai", "Delhi", "Mumbai", "Pune"]
                .map(String::from)
                .to_vec(),
        ),
        (
            CategoricalField::Transmission,
            vec!["Automatic".to_string(), "Manual".to_string()],
        ),
        (
            CategoricalField::PriceType,
            vec!["Fixed".to_string(), "Negotiable".to_string()],
        ),
    ];
    let mut encoders = BTreeMap::new();
    for (field, values) in labels {
        encoders.insert(field, LabelEncoder::new(field.name()).fit(&values)?);
    }
    EncoderSet::new(encoders)
}

pub fn synthetic_artifact(n_trees: usize, depth: usize) -> Result<Artifact> {
    Artifact::new(
        synthetic_forest(n_trees, depth)?.into(),
        synthetic_encoders(200)?,
    )
}

/// A row every synthetic artifact accepts.
pub fn sample_row() -> FeatureRow {
    FeatureRow {
        brand_model: "Brand 0042".to_string(),
        city: "Pune".to_string(),
        model_year: 2018,
        mileage_in_km: 45_000,
        engine_in_cc: 1_200,
        transmission: "Manual".to_string(),
        price_type: "Fixed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carprice::PricePipeline;

    #[test]
    fn test_synthetic_tree_shape() {
        let forest = synthetic_forest(3, 4).unwrap();
        assert_eq!(forest.n_trees(), 3);
        assert_eq!(forest.trees()[0].nodes().len(), 31);
        assert_eq!(forest.n_features(), N_FEATURES);
    }

    #[test]
    fn test_synthetic_artifact_predicts() {
        let pipeline = PricePipeline::new(synthetic_artifact(10, 6).unwrap());
        let price = pipeline.predict(&sample_row()).unwrap();
        assert!(price.lacs() > 0.0);
    }
}
