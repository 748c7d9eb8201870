//! Raw and encoded feature rows.

use crate::error::{PriceError, Result};
use crate::schema::{Field, N_FEATURES};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// One car, as entered by the user.
///
/// Serialized field names are the training column names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub brand_model: String,
    pub city: String,
    #[serde(rename = "model")]
    pub model_year: i32,
    pub mileage_in_km: u32,
    pub engine_in_cc: u32,
    #[serde(rename = "Transmission")]
    pub transmission: String,
    pub price_type: String,
}

impl FeatureRow {
    /// Value of a numeric field, or `None` for categorical fields.
    pub fn number(&self, field: Field) -> Option<i64> {
        match field {
            Field::ModelYear => Some(i64::from(self.model_year)),
            Field::MileageInKm => Some(i64::from(self.mileage_in_km)),
            Field::EngineInCc => Some(i64::from(self.engine_in_cc)),
            _ => None,
        }
    }
}

/// A feature row after categorical encoding, in schema column order.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedRow {
    values: Array1<f64>,
}

impl EncodedRow {
    pub(crate) fn from_values(values: [f64; N_FEATURES]) -> Self {
        Self {
            values: Array1::from(values.to_vec()),
        }
    }

    pub fn get(&self, field: Field) -> f64 {
        self.values[field.index()]
    }

    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.to_vec()
    }
}

/// Inclusive ranges accepted for the numeric inputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputBounds {
    pub year_min: i64,
    pub year_max: i64,
    pub mileage_min: i64,
    pub mileage_max: i64,
    pub engine_min: i64,
    pub engine_max: i64,
}

impl Default for InputBounds {
    fn default() -> Self {
        Self {
            year_min: 1990,
            year_max: 2025,
            mileage_min: 0,
            mileage_max: 500_000,
            engine_min: 800,
            engine_max: 5_000,
        }
    }
}

impl InputBounds {
    /// The `(min, max)` range for a numeric field.
    pub fn range(&self, field: Field) -> Option<(i64, i64)> {
        match field {
            Field::ModelYear => Some((self.year_min, self.year_max)),
            Field::MileageInKm => Some((self.mileage_min, self.mileage_max)),
            Field::EngineInCc => Some((self.engine_min, self.engine_max)),
            _ => None,
        }
    }

    /// Reject any numeric field outside its range.
    pub fn check(&self, row: &FeatureRow) -> Result<()> {
        for field in Field::ALL {
            let (Some(value), Some((min, max))) = (row.number(field), self.range(field)) else {
                continue;
            };
            if value < min || value > max {
                return Err(PriceError::InputOutOfRange {
                    field: field.column_name().to_string(),
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for field in [Field::ModelYear, Field::MileageInKm, Field::EngineInCc] {
            if let Some((min, max)) = self.range(field) {
                if min > max {
                    return Err(PriceError::Config(format!(
                        "bounds for {} are empty: {} > {}",
                        field, min, max
                    )));
                }
            }
        }
        Ok(())
    }
}
