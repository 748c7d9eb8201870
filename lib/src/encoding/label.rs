//! Label encoding for categorical string columns.
//!
//! Maps each known label to its index in the sorted class list, the same
//! codes a scikit-learn `LabelEncoder` assigns during training.

use crate::error::{PriceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Unfitted label encoder.
///
/// # Example
/// ```
/// use carprice::encoding::LabelEncoder;
///
/// let fitted = LabelEncoder::new("city")
///     .fit(&["Pune", "Delhi", "Pune", "Mumbai"])
///     .unwrap();
///
/// assert_eq!(fitted.classes(), &["Delhi", "Mumbai", "Pune"]);
/// assert_eq!(fitted.transform("Pune").unwrap(), 2);
/// assert_eq!(fitted.inverse_transform(0).unwrap(), "Delhi");
/// ```
#[derive(Clone, Debug)]
pub struct LabelEncoder {
    field: String,
}

impl LabelEncoder {
    /// Create an encoder for the named column. The name appears in errors.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Learn the sorted set of distinct labels.
    pub fn fit<S: AsRef<str>>(&self, labels: &[S]) -> Result<FittedLabelEncoder> {
        if labels.is_empty() {
            return Err(PriceError::InvalidParameter(format!(
                "cannot fit label encoder for {} on empty data",
                self.field
            )));
        }

        let classes: BTreeSet<&str> = labels.iter().map(|l| l.as_ref()).collect();
        let classes = classes.into_iter().map(str::to_string).collect();

        FittedLabelEncoder::from_params(&self.field, LabelEncoderParams { classes })
    }
}

/// Serializable parameters for a fitted label encoder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoderParams {
    /// Distinct labels in sorted order; a label's code is its index.
    pub classes: Vec<String>,
}

/// Fitted label encoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedLabelEncoder {
    field: String,
    classes: Vec<String>,
    class_to_idx: HashMap<String, u32>,
}

impl FittedLabelEncoder {
    /// Name of the column this encoder was fitted on.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Known labels in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.class_to_idx.contains_key(label)
    }

    /// Encode a label to its trained code.
    pub fn transform(&self, label: &str) -> Result<u32> {
        self.class_to_idx
            .get(label)
            .copied()
            .ok_or_else(|| PriceError::UnknownCategory {
                field: self.field.clone(),
                value: label.to_string(),
            })
    }

    /// Decode a code back to its label.
    pub fn inverse_transform(&self, code: u32) -> Result<&str> {
        self.classes
            .get(code as usize)
            .map(String::as_str)
            .ok_or_else(|| PriceError::UnknownCategory {
                field: self.field.clone(),
                value: format!("code {}", code),
            })
    }

    pub fn extract_params(&self) -> LabelEncoderParams {
        LabelEncoderParams {
            classes: self.classes.clone(),
        }
    }

    /// Rebuild from stored classes, which must be non-empty, sorted and distinct.
    pub fn from_params(field: &str, params: LabelEncoderParams) -> Result<Self> {
        if params.classes.is_empty() {
            return Err(PriceError::InvalidParameter(format!(
                "encoder for {} has no classes",
                field
            )));
        }
        if let Some(pair) = params.classes.windows(2).find(|w| w[0] >= w[1]) {
            return Err(PriceError::InvalidParameter(format!(
                "encoder for {} has unsorted or duplicate classes at {:?} / {:?}",
                field, pair[0], pair[1]
            )));
        }
        if params.classes.len() > u32::MAX as usize {
            return Err(PriceError::InvalidParameter(format!(
                "encoder for {} has too many classes",
                field
            )));
        }

        let class_to_idx = params
            .classes
            .iter()
            .enumerate()
            .map(|(idx, class)| (class.clone(), idx as u32))
            .collect();

        Ok(Self {
            field: field.to_string(),
            classes: params.classes,
            class_to_idx,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transmission() -> FittedLabelEncoder {
        LabelEncoder::new("Transmission")
            .fit(&["Manual", "Automatic", "Manual"])
            .unwrap()
    }

    #[test]
    fn test_label_encoder_basic() {
        let fitted = transmission();
        assert_eq!(fitted.n_classes(), 2);
        assert_eq!(fitted.classes(), &["Automatic", "Manual"]);
        assert_eq!(fitted.transform("Automatic").unwrap(), 0);
        assert_eq!(fitted.transform("Manual").unwrap(), 1);
        assert_eq!(fitted.field(), "Transmission");
    }

    #[test]
    fn test_label_encoder_round_trip_every_class() {
        let fitted = LabelEncoder::new("brand_model")
            .fit(&["Maruti Swift", "Honda City", "Hyundai i20", "Toyota Innova"])
            .unwrap();
        for class in fitted.classes() {
            let code = fitted.transform(class).unwrap();
            assert_eq!(fitted.inverse_transform(code).unwrap(), class);
        }
    }

    #[test]
    fn test_label_encoder_unknown_error() {
        let err = transmission().transform("CVT").unwrap_err();
        match err {
            PriceError::UnknownCategory { field, value } => {
                assert_eq!(field, "Transmission");
                assert_eq!(value, "CVT");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_label_encoder_is_case_sensitive() {
        assert!(transmission().transform("manual").is_err());
        assert!(!transmission().contains("manual"));
    }

    #[test]
    fn test_inverse_out_of_range() {
        assert!(matches!(
            transmission().inverse_transform(2),
            Err(PriceError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_label_encoder_empty_data() {
        let labels: [&str; 0] = [];
        assert!(matches!(
            LabelEncoder::new("city").fit(&labels),
            Err(PriceError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_from_params_rejects_bad_classes() {
        let unsorted = LabelEncoderParams {
            classes: vec!["b".to_string(), "a".to_string()],
        };
        assert!(FittedLabelEncoder::from_params("city", unsorted).is_err());

        let dup = LabelEncoderParams {
            classes: vec!["a".to_string(), "a".to_string()],
        };
        assert!(FittedLabelEncoder::from_params("city", dup).is_err());

        let empty = LabelEncoderParams { classes: vec![] };
        assert!(FittedLabelEncoder::from_params("city", empty).is_err());
    }

    #[test]
    fn test_params_rebuild_same_codes() {
        let fitted = transmission();
        let rebuilt =
            FittedLabelEncoder::from_params("Transmission", fitted.extract_params()).unwrap();
        assert_eq!(rebuilt.classes(), fitted.classes());
        assert_eq!(
            rebuilt.transform("Manual").unwrap(),
            fitted.transform("Manual").unwrap()
        );
    }
}
