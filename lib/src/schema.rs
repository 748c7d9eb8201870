//! The fixed feature schema shared by the encoders, the row builder and the model.
//!
//! Column names follow the training data verbatim, including the mixed case of
//! `Transmission` and the year column being called `model`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version of the column layout below. Bump when columns change.
pub const SCHEMA_VERSION: u32 = 1;

/// Number of columns in a feature row.
pub const N_FEATURES: usize = 7;

/// Every column of the feature row, in model order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    BrandModel,
    City,
    ModelYear,
    MileageInKm,
    EngineInCc,
    Transmission,
    PriceType,
}

impl Field {
    pub const ALL: [Field; N_FEATURES] = [
        Field::BrandModel,
        Field::City,
        Field::ModelYear,
        Field::MileageInKm,
        Field::EngineInCc,
        Field::Transmission,
        Field::PriceType,
    ];

    /// Column name as the model was trained with it.
    pub fn column_name(self) -> &'static str {
        match self {
            Field::BrandModel => "brand_model",
            Field::City => "city",
            Field::ModelYear => "model",
            Field::MileageInKm => "mileage_in_km",
            Field::EngineInCc => "engine_in_cc",
            Field::Transmission => "Transmission",
            Field::PriceType => "price_type",
        }
    }

    /// Position of the column in the feature row.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_column_name(name: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|f| f.column_name() == name)
    }

    /// The categorical view of this field, if it is encoded.
    pub fn categorical(self) -> Option<CategoricalField> {
        match self {
            Field::BrandModel => Some(CategoricalField::BrandModel),
            Field::City => Some(CategoricalField::City),
            Field::Transmission => Some(CategoricalField::Transmission),
            Field::PriceType => Some(CategoricalField::PriceType),
            Field::ModelYear | Field::MileageInKm | Field::EngineInCc => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// The closed set of fields that go through a label encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoricalField {
    BrandModel,
    City,
    Transmission,
    PriceType,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 4] = [
        CategoricalField::BrandModel,
        CategoricalField::City,
        CategoricalField::Transmission,
        CategoricalField::PriceType,
    ];

    pub fn field(self) -> Field {
        match self {
            CategoricalField::BrandModel => Field::BrandModel,
            CategoricalField::City => Field::City,
            CategoricalField::Transmission => Field::Transmission,
            CategoricalField::PriceType => Field::PriceType,
        }
    }

    pub fn name(self) -> &'static str {
        self.field().column_name()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Field::from_column_name(name).and_then(Field::categorical)
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Versioned column layout stored alongside every artifact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    pub columns: Vec<String>,
}

impl FeatureSchema {
    /// The layout this build of the crate produces rows for.
    pub fn current() -> Self {
        Self {
            version: SCHEMA_VERSION,
            columns: Field::ALL
                .iter()
                .map(|f| f.column_name().to_string())
                .collect(),
        }
    }

    /// Check that an artifact's schema is the one rows are built with.
    pub fn check_compatible(&self) -> Result<(), String> {
        if self.version != SCHEMA_VERSION {
            return Err(format!(
                "schema version {} is not supported (expected {})",
                self.version, SCHEMA_VERSION
            ));
        }
        let expected = Self::current().columns;
        if self.columns != expected {
            return Err(format!(
                "column layout {:?} does not match expected {:?}",
                self.columns, expected
            ));
        }
        Ok(())
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order_matches_training_columns() {
        let names: Vec<_> = Field::ALL.iter().map(|f| f.column_name()).collect();
        assert_eq!(
            names,
            [
                "brand_model",
                "city",
                "model",
                "mileage_in_km",
                "engine_in_cc",
                "Transmission",
                "price_type"
            ]
        );
        for (i, f) in Field::ALL.iter().enumerate() {
            assert_eq!(f.index(), i);
        }
    }

    #[test]
    fn test_categorical_lookup() {
        assert_eq!(
            CategoricalField::from_name("Transmission"),
            Some(CategoricalField::Transmission)
        );
        assert_eq!(CategoricalField::from_name("transmission"), None);
        assert_eq!(CategoricalField::from_name("model"), None);
        assert_eq!(Field::ModelYear.categorical(), None);
        for c in CategoricalField::ALL {
            assert_eq!(c.field().categorical(), Some(c));
        }
    }

    #[test]
    fn test_schema_current_is_compatible() {
        assert!(FeatureSchema::current().check_compatible().is_ok());
    }

    #[test]
    fn test_schema_rejects_version_and_order() {
        let mut schema = FeatureSchema::current();
        schema.version = 2;
        assert!(schema.check_compatible().is_err());

        let mut schema = FeatureSchema::current();
        schema.columns.swap(0, 1);
        let err = schema.check_compatible().unwrap_err();
        assert!(err.contains("column layout"));

        let mut schema = FeatureSchema::current();
        schema.columns.pop();
        assert!(schema.check_compatible().is_err());
    }
}
