//! Linear regression: `y = w^T x + b`.

use super::{check_input_len, InferenceModel};
use crate::error::{PriceError, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Serializable representation of linear model parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// A fitted linear regressor.
#[derive(Clone, Debug)]
pub struct LinearRegressor {
    weights: Array1<f64>,
    bias: f64,
}

impl LinearRegressor {
    pub fn new(weights: Array1<f64>, bias: f64) -> Result<Self> {
        if weights.is_empty() {
            return Err(PriceError::InvalidParameter(
                "linear model has no weights".to_string(),
            ));
        }
        if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(PriceError::InvalidParameter(
                "linear model has non-finite parameters".to_string(),
            ));
        }
        Ok(Self { weights, bias })
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }
}

impl InferenceModel for LinearRegressor {
    type ParamsRepr = LinearParams;

    fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn predict(&self, input: ArrayView1<'_, f64>) -> Result<f64> {
        check_input_len(self.weights.len(), &input)?;
        Ok(self.weights.dot(&input) + self.bias)
    }

    fn predict_batch(&self, input: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        if input.ncols() != self.weights.len() {
            return Err(PriceError::Inference(format!(
                "model expects {} features, got {}",
                self.weights.len(),
                input.ncols()
            )));
        }
        Ok(input.dot(&self.weights) + self.bias)
    }

    fn extract_params(&self) -> LinearParams {
        LinearParams {
            weights: self.weights.to_vec(),
            bias: self.bias,
        }
    }

    fn from_params(params: LinearParams) -> Result<Self> {
        Self::new(Array1::from(params.weights), params.bias)
    }
}
