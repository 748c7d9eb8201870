//! Categorical feature encoding.
//!
//! Each categorical column of the feature row has one [`FittedLabelEncoder`].
//! [`EncoderSet`] keys them by [`CategoricalField`] so that completeness is a
//! property checked once, when the set is built, rather than at every lookup.

mod label;

pub use label::{FittedLabelEncoder, LabelEncoder, LabelEncoderParams};

use crate::error::{PriceError, Result};
use crate::schema::{CategoricalField, Field};
use std::collections::BTreeMap;

/// Stored form of an encoder set: column name to encoder parameters.
pub type EncoderSetParams = BTreeMap<String, LabelEncoderParams>;

/// One fitted encoder per categorical field.
#[derive(Clone, Debug)]
pub struct EncoderSet {
    encoders: BTreeMap<CategoricalField, FittedLabelEncoder>,
}

impl EncoderSet {
    /// Build from fitted encoders. Every categorical field must be covered.
    pub fn new(encoders: BTreeMap<CategoricalField, FittedLabelEncoder>) -> Result<Self> {
        if let Some(missing) = CategoricalField::ALL
            .into_iter()
            .find(|f| !encoders.contains_key(f))
        {
            return Err(PriceError::InvalidParameter(format!(
                "no encoder for categorical field {}",
                missing
            )));
        }
        Ok(Self { encoders })
    }

    /// Rebuild from stored parameters keyed by column name.
    ///
    /// Names that are not categorical columns are rejected, including the
    /// numeric ones: numeric columns are never encoded.
    pub fn from_params(params: EncoderSetParams) -> Result<Self> {
        let mut encoders = BTreeMap::new();
        for (name, p) in params {
            let field = match Field::from_column_name(&name) {
                Some(field) => field.categorical().ok_or_else(|| {
                    PriceError::InvalidParameter(format!(
                        "encoder given for numeric field {}",
                        name
                    ))
                })?,
                None => {
                    return Err(PriceError::InvalidParameter(format!(
                        "encoder given for unknown field {:?}",
                        name
                    )))
                }
            };
            encoders.insert(field, FittedLabelEncoder::from_params(field.name(), p)?);
        }
        Self::new(encoders)
    }

    pub fn extract_params(&self) -> EncoderSetParams {
        self.encoders
            .iter()
            .map(|(field, enc)| (field.name().to_string(), enc.extract_params()))
            .collect()
    }

    pub fn get(&self, field: CategoricalField) -> &FittedLabelEncoder {
        // Presence of every field is checked in `new`.
        &self.encoders[&field]
    }

    /// Encode a raw label for the given field.
    pub fn encode(&self, field: CategoricalField, value: &str) -> Result<u32> {
        self.get(field).transform(value)
    }

    pub fn decode(&self, field: CategoricalField, code: u32) -> Result<&str> {
        self.get(field).inverse_transform(code)
    }

    /// The choices a presentation layer may offer for `field`.
    pub fn classes(&self, field: CategoricalField) -> &[String] {
        self.get(field).classes()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategoricalField, &FittedLabelEncoder)> {
        self.encoders.iter().map(|(f, e)| (*f, e))
    }
}
