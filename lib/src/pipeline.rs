//! Encode-then-predict pipeline.
//!
//! [`PricePipeline`] holds a shared, immutable [`Artifact`]. Each call to
//! [`PricePipeline::predict`] encodes the categorical columns, keeps the
//! numeric ones as they are, and runs the model on the assembled row. Nothing
//! is cached between calls.

use crate::artifact::Artifact;
use crate::encoding::EncoderSet;
use crate::error::{PriceError, Result};
use crate::model::InferenceModel;
use crate::row::{EncodedRow, FeatureRow};
use crate::schema::{CategoricalField, Field, N_FEATURES};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A price estimate in lacs (units of 100,000).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
pub struct PricePrediction(pub f64);

impl PricePrediction {
    pub fn lacs(self) -> f64 {
        self.0
    }
}

impl fmt::Display for PricePrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} lacs", self.0)
    }
}

/// Encode a raw row against an encoder set, in schema order.
pub fn encode_row(encoders: &EncoderSet, row: &FeatureRow) -> Result<EncodedRow> {
    let code = |field: CategoricalField, label: &str| -> Result<f64> {
        encoders.encode(field, label).map(f64::from)
    };
    let mut values = [0.0; N_FEATURES];
    values[Field::BrandModel.index()] = code(CategoricalField::BrandModel, &row.brand_model)?;
    values[Field::City.index()] = code(CategoricalField::City, &row.city)?;
    values[Field::ModelYear.index()] = f64::from(row.model_year);
    values[Field::MileageInKm.index()] = f64::from(row.mileage_in_km);
    values[Field::EngineInCc.index()] = f64::from(row.engine_in_cc);
    values[Field::Transmission.index()] = code(CategoricalField::Transmission, &row.transmission)?;
    values[Field::PriceType.index()] = code(CategoricalField::PriceType, &row.price_type)?;
    Ok(EncodedRow::from_values(values))
}

/// Shared inference entry point.
#[derive(Clone, Debug)]
pub struct PricePipeline {
    artifact: Arc<Artifact>,
}

impl PricePipeline {
    pub fn new(artifact: Artifact) -> Self {
        Self::from_shared(Arc::new(artifact))
    }

    pub fn from_shared(artifact: Arc<Artifact>) -> Self {
        Self { artifact }
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    pub fn encode_row(&self, row: &FeatureRow) -> Result<EncodedRow> {
        encode_row(self.artifact.encoders(), row)
    }

    /// Run the full pipeline for one row.
    pub fn predict(&self, row: &FeatureRow) -> Result<PricePrediction> {
        let encoded = self.encode_row(row)?;
        log::debug!("encoded row {:?}", encoded.to_vec());

        let price = self.artifact.model().predict(encoded.view())?;
        if !price.is_finite() {
            return Err(PriceError::Inference(format!(
                "model returned non-finite price {}",
                price
            )));
        }
        log::debug!("predicted {:.4} lacs", price);
        Ok(PricePrediction(price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::tests::{artifact, bundle};
    use crate::model::{LinearParams, RegressorParams};
    use crate::row::InputBounds;

    fn swift() -> FeatureRow {
        FeatureRow {
            brand_model: "Maruti Swift".to_string(),
            city: "Pune".to_string(),
            model_year: 2018,
            mileage_in_km: 45_000,
            engine_in_cc: 1_200,
            transmission: "Manual".to_string(),
            price_type: "Fixed".to_string(),
        }
    }

    #[test]
    fn test_encode_row_in_schema_order() {
        let pipeline = PricePipeline::new(artifact());
        let encoded = pipeline.encode_row(&swift()).unwrap();
        assert_eq!(
            encoded.to_vec(),
            vec![2.0, 2.0, 2018.0, 45_000.0, 1_200.0, 1.0, 0.0]
        );
        assert_eq!(encoded.get(Field::Transmission), 1.0);
    }

    #[test]
    fn test_numeric_boundaries_pass_through() {
        let pipeline = PricePipeline::new(artifact());
        let bounds = InputBounds::default();
        for (year, mileage, engine) in [(1990, 0, 800), (2025, 500_000, 5_000)] {
            let row = FeatureRow {
                model_year: year,
                mileage_in_km: mileage,
                engine_in_cc: engine,
                ..swift()
            };
            bounds.check(&row).unwrap();
            let encoded = pipeline.encode_row(&row).unwrap();
            assert_eq!(encoded.get(Field::ModelYear), f64::from(year));
            assert_eq!(encoded.get(Field::MileageInKm), f64::from(mileage));
            assert_eq!(encoded.get(Field::EngineInCc), f64::from(engine));
            assert!(pipeline.predict(&row).is_ok());
        }
    }

    #[test]
    fn test_predict_known_row() {
        let pipeline = PricePipeline::new(artifact());
        // trees: 6.0 (new manual), 4.0 (city code 2), 5.25
        let price = pipeline.predict(&swift()).unwrap();
        assert!((price.lacs() - 15.25 / 3.0).abs() < 1e-12);
        assert_eq!(price.to_string(), "5.08 lacs");
    }

    #[test]
    fn test_predict_is_deterministic() {
        let pipeline = PricePipeline::new(artifact());
        let first = pipeline.predict(&swift()).unwrap();
        for _ in 0..10 {
            assert_eq!(pipeline.predict(&swift()).unwrap(), first);
        }
    }

    #[test]
    fn test_single_categorical_change_moves_price() {
        let pipeline = PricePipeline::new(artifact());
        let manual = pipeline.predict(&swift()).unwrap();
        let automatic = pipeline
            .predict(&FeatureRow {
                transmission: "Automatic".to_string(),
                ..swift()
            })
            .unwrap();
        assert!((automatic.lacs() - 18.25 / 3.0).abs() < 1e-12);
        assert_ne!(manual, automatic);
        // no state carried over from the previous request
        assert_eq!(pipeline.predict(&swift()).unwrap(), manual);
    }

    #[test]
    fn test_unknown_category_fails() {
        let pipeline = PricePipeline::new(artifact());
        let row = FeatureRow {
            city: "Atlantis".to_string(),
            ..swift()
        };
        assert!(matches!(
            pipeline.predict(&row),
            Err(PriceError::UnknownCategory { field, .. }) if field == "city"
        ));
    }

    #[test]
    fn test_linear_artifact() {
        let mut b = bundle();
        // price = 0.5 * year - 0.00001 * mileage - 1000
        let mut weights = vec![0.0; N_FEATURES];
        weights[Field::ModelYear.index()] = 0.5;
        weights[Field::MileageInKm.index()] = -0.00001;
        b.model = RegressorParams::Linear(LinearParams {
            weights,
            bias: -1000.0,
        });
        let pipeline = PricePipeline::new(Artifact::from_bundle(b).unwrap());
        let price = pipeline.predict(&swift()).unwrap();
        assert!((price.lacs() - (0.5 * 2018.0 - 0.45 - 1000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_pipeline_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PricePipeline>();

        let pipeline = PricePipeline::new(artifact());
        let expected = pipeline.predict(&swift()).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let p = pipeline.clone();
                std::thread::spawn(move || p.predict(&swift()).unwrap())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(PricePrediction(5.0).to_string(), "5.00 lacs");
        assert_eq!(PricePrediction(12.346).to_string(), "12.35 lacs");
    }
}
