//! Build a small demonstration artifact.
//!
//! The encoders are fitted on a handful of listings and the forest is written
//! out by hand, so the result is only good for trying the CLI, not for real
//! prices. Real artifacts come from the training job.
//!
//! Run with: cargo run -p carprice --example build_artifact -- [output path]

use carprice::{
    artifact::DEFAULT_ARTIFACT_PATH,
    encoding::LabelEncoder,
    model::{RandomForestParams, RandomForestRegressor, TreeNode},
    schema::{Field, N_FEATURES},
    Artifact, CategoricalField, EncoderSet, InferenceModel,
};
use std::collections::BTreeMap;
use std::error::Error;

const LISTINGS: &[(&str, &str, &str, &str)] = &[
    ("Maruti Swift", "Pune", "Manual", "Fixed"),
    ("Hyundai i20", "Mumbai", "Manual", "Negotiable"),
    ("Honda City", "Delhi", "Automatic", "Fixed"),
    ("Toyota Innova", "Bangalore", "Manual", "Negotiable"),
    ("Maruti Baleno", "Pune", "Automatic", "Fixed"),
    ("Mahindra XUV500", "Delhi", "Manual", "Negotiable"),
];

fn split(field: Field, threshold: f64, left: usize, right: usize) -> TreeNode {
    TreeNode::Split {
        feature: field.index(),
        threshold,
        left,
        right,
    }
}

fn leaf(value: f64) -> TreeNode {
    TreeNode::Leaf { value }
}

fn main() -> Result<(), Box<dyn Error>> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ARTIFACT_PATH.to_string());

    let mut encoders = BTreeMap::new();
    for field in CategoricalField::ALL {
        let labels: Vec<&str> = LISTINGS
            .iter()
            .map(|&(brand, city, transmission, price_type)| match field {
                CategoricalField::BrandModel => brand,
                CategoricalField::City => city,
                CategoricalField::Transmission => transmission,
                CategoricalField::PriceType => price_type,
            })
            .collect();
        let fitted = LabelEncoder::new(field.name()).fit(&labels)?;
        println!("{:<14} {:?}", field.name(), fitted.classes());
        encoders.insert(field, fitted);
    }

    // Newer, less driven, larger-engined cars cost more.
    let forest = RandomForestRegressor::from_params(RandomForestParams {
        n_features: N_FEATURES,
        trees: vec![
            vec![
                split(Field::ModelYear, 2015.5, 1, 4),
                split(Field::MileageInKm, 80_000.0, 2, 3),
                leaf(3.4),
                leaf(2.1),
                split(Field::EngineInCc, 1_500.0, 5, 6),
                leaf(6.2),
                leaf(11.8),
            ],
            vec![
                split(Field::ModelYear, 2012.5, 1, 2),
                leaf(2.5),
                split(Field::Transmission, 0.5, 3, 4),
                leaf(8.9),
                leaf(6.0),
            ],
            vec![
                split(Field::EngineInCc, 1_300.0, 1, 2),
                leaf(4.1),
                split(Field::MileageInKm, 50_000.0, 3, 4),
                leaf(9.7),
                leaf(6.6),
            ],
        ],
    })?;
    println!("forest: {} trees over {} features", forest.n_trees(), forest.n_features());

    let artifact = Artifact::new(forest.into(), EncoderSet::new(encoders)?)?;
    artifact.save(&output)?;
    println!("\n{}", artifact.summary());
    println!("\nWritten to {}", output);

    Ok(())
}
