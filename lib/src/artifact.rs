//! Loading and saving the model artifact.
//!
//! An artifact bundles the trained model, one encoder per categorical field and
//! the feature schema both were built against. [`Artifact::load`] validates all
//! three before returning, so a caller either holds a complete artifact or an
//! error.

use crate::encoding::{EncoderSet, EncoderSetParams};
use crate::error::{PriceError, Result};
use crate::model::{InferenceModel, Regressor, RegressorParams};
use crate::schema::{CategoricalField, FeatureSchema, N_FEATURES};
use crate::serialization::ArtifactFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Conventional artifact location.
pub const DEFAULT_ARTIFACT_PATH: &str = "random_forest_model.bin";

/// On-disk layout of an artifact.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArtifactBundle {
    pub schema: FeatureSchema,
    pub model: RegressorParams,
    pub encoders: EncoderSetParams,
}

/// A validated, immutable model plus encoders.
#[derive(Clone, Debug)]
pub struct Artifact {
    schema: FeatureSchema,
    model: Regressor,
    encoders: EncoderSet,
}

impl Artifact {
    /// Assemble an artifact for the current schema.
    pub fn new(model: Regressor, encoders: EncoderSet) -> Result<Self> {
        if model.n_features() != N_FEATURES {
            return Err(PriceError::InvalidParameter(format!(
                "model takes {} features, feature rows have {}",
                model.n_features(),
                N_FEATURES
            )));
        }
        Ok(Self {
            schema: FeatureSchema::current(),
            model,
            encoders,
        })
    }

    /// Read and validate an artifact file. The format follows the extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| PriceError::artifact_load(path, e))?;
        let artifact = Self::decode(&bytes, ArtifactFormat::from_path(path))
            .map_err(|reason| PriceError::artifact_load(path, reason))?;

        log::info!(
            "loaded {} model ({}) from {}",
            artifact.model.kind(),
            artifact.model.describe(),
            path.display()
        );
        for (field, encoder) in artifact.encoders.iter() {
            log::debug!("encoder {}: {} classes", field, encoder.n_classes());
        }
        Ok(artifact)
    }

    /// Validate an in-memory artifact.
    pub fn from_bytes(bytes: &[u8], format: ArtifactFormat) -> Result<Self> {
        Self::decode(bytes, format).map_err(|reason| PriceError::artifact_load("<memory>", reason))
    }

    fn decode(bytes: &[u8], format: ArtifactFormat) -> std::result::Result<Self, String> {
        let bundle: ArtifactBundle = format.decode(bytes)?;
        Self::validate(bundle).map_err(|e| e.to_string())
    }

    /// Validate an already decoded bundle.
    pub fn from_bundle(bundle: ArtifactBundle) -> Result<Self> {
        Self::validate(bundle).map_err(|e| PriceError::artifact_load("<bundle>", e))
    }

    fn validate(bundle: ArtifactBundle) -> Result<Self> {
        bundle
            .schema
            .check_compatible()
            .map_err(PriceError::InvalidParameter)?;
        let encoders = EncoderSet::from_params(bundle.encoders)?;
        let model = Regressor::from_params(bundle.model)?;
        Self::new(model, encoders)
    }

    pub fn to_bundle(&self) -> ArtifactBundle {
        ArtifactBundle {
            schema: self.schema.clone(),
            model: self.model.extract_params(),
            encoders: self.encoders.extract_params(),
        }
    }

    pub fn to_bytes(&self, format: ArtifactFormat) -> Result<Vec<u8>> {
        format
            .encode(&self.to_bundle())
            .map_err(PriceError::InvalidParameter)
    }

    /// Write the artifact, picking the format from the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes(ArtifactFormat::from_path(path))?;
        std::fs::write(path, bytes)?;
        log::info!("saved artifact to {}", path.display());
        Ok(())
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn model(&self) -> &Regressor {
        &self.model
    }

    pub fn encoders(&self) -> &EncoderSet {
        &self.encoders
    }

    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            model_kind: self.model.kind(),
            model_size: self.model.describe(),
            schema_version: self.schema.version,
            columns: self.schema.columns.clone(),
            class_counts: self
                .encoders
                .iter()
                .map(|(field, enc)| (field, enc.n_classes()))
                .collect(),
        }
    }
}

/// Human-readable overview of an artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactSummary {
    pub model_kind: &'static str,
    pub model_size: String,
    pub schema_version: u32,
    pub columns: Vec<String>,
    pub class_counts: Vec<(CategoricalField, usize)>,
}

impl fmt::Display for ArtifactSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model:   {} ({})", self.model_kind, self.model_size)?;
        writeln!(
            f,
            "Schema:  v{} [{}]",
            self.schema_version,
            self.columns.join(", ")
        )?;
        write!(f, "Encoders:")?;
        for (field, count) in &self.class_counts {
            write!(f, "\n  {:<14} {} classes", field.name(), count)?;
        }
        Ok(())
    }
}
