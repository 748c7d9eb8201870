//! # carprice
//!
//! Car price estimation over a pre-trained regression artifact.
//!
//! A prediction is three steps: encode the categorical inputs with the
//! encoders the model was trained with, assemble a row in the fixed column
//! order, and run the model. The artifact holding the model and encoders is
//! loaded once, validated against the feature schema, and then only read.
//!
//! ## Quick Start
//!
//! ```no_run
//! use carprice::{Artifact, FeatureRow, PricePipeline};
//!
//! let artifact = Artifact::load("random_forest_model.bin")?;
//! let pipeline = PricePipeline::new(artifact);
//!
//! let price = pipeline.predict(&FeatureRow {
//!     brand_model: "Maruti Swift".to_string(),
//!     city: "Pune".to_string(),
//!     model_year: 2018,
//!     mileage_in_km: 45_000,
//!     engine_in_cc: 1_200,
//!     transmission: "Manual".to_string(),
//!     price_type: "Fixed".to_string(),
//! })?;
//! println!("Predicted Price: {}", price);
//! # Ok::<(), carprice::PriceError>(())
//! ```
//!
//! ## Module Structure
//!
//! - `schema` — column layout shared by rows, encoders and models
//! - `encoding` — label encoders for the categorical columns
//! - `model` — random forest and linear regressors
//! - `artifact` — loading, validating and saving the model bundle
//! - `pipeline` — the encode-then-predict entry point
//! - `config` — TOML configuration

/// Loading, validation and persistence of model bundles.
pub mod artifact;

/// TOML configuration.
pub mod config;

/// Categorical label encoders.
pub mod encoding;

pub mod error;

/// Inference-only regression models.
pub mod model;

/// Encode-then-predict pipeline.
pub mod pipeline;

/// Raw and encoded feature rows, input bounds.
pub mod row;

pub mod schema;

/// Byte codecs for parameters and bundles.
pub mod serialization;

pub use artifact::{Artifact, ArtifactBundle, ArtifactSummary};
pub use config::Config;
pub use encoding::{EncoderSet, FittedLabelEncoder, LabelEncoder};
pub use error::{PriceError, Result};
pub use model::{InferenceModel, Regressor};
pub use pipeline::{PricePipeline, PricePrediction};
pub use row::{EncodedRow, FeatureRow, InputBounds};
pub use schema::{CategoricalField, FeatureSchema, Field};
pub use serialization::ArtifactFormat;
