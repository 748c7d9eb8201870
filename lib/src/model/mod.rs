//! Trained regression estimators.
//!
//! Models here are inference-only: they are rebuilt from stored parameters,
//! validated once, and never mutated afterwards. Training happens elsewhere.

pub mod forest;
pub mod linear;

pub use forest::{DecisionTreeRegressor, RandomForestParams, RandomForestRegressor, TreeNode};
pub use linear::{LinearParams, LinearRegressor};

use crate::error::{PriceError, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Prediction interface of a fitted model.
pub trait InferenceModel {
    /// Plain-data parameter representation used for persistence.
    type ParamsRepr;

    /// Number of columns each input row must have.
    fn n_features(&self) -> usize;

    /// Predict a single sample.
    fn predict(&self, input: ArrayView1<'_, f64>) -> Result<f64>;

    /// Predict every row of a batch.
    fn predict_batch(&self, input: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        input.rows().into_iter().map(|row| self.predict(row)).collect()
    }

    fn extract_params(&self) -> Self::ParamsRepr;

    fn from_params(params: Self::ParamsRepr) -> Result<Self>
    where
        Self: Sized;
}

pub(crate) fn check_input_len(expected: usize, input: &ArrayView1<'_, f64>) -> Result<()> {
    if input.len() != expected {
        return Err(PriceError::Inference(format!(
            "model expects {} features, got {}",
            expected,
            input.len()
        )));
    }
    Ok(())
}

/// Stored form of any supported estimator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RegressorParams {
    RandomForest(RandomForestParams),
    Linear(LinearParams),
}

/// Any supported fitted estimator.
#[derive(Clone, Debug)]
pub enum Regressor {
    RandomForest(RandomForestRegressor),
    Linear(LinearRegressor),
}

impl Regressor {
    pub fn kind(&self) -> &'static str {
        match self {
            Regressor::RandomForest(_) => "random_forest",
            Regressor::Linear(_) => "linear",
        }
    }

    /// Short description of the model's size, e.g. `100 trees`.
    pub fn describe(&self) -> String {
        match self {
            Regressor::RandomForest(m) => format!("{} trees", m.n_trees()),
            Regressor::Linear(m) => format!("{} weights", m.n_features()),
        }
    }
}

impl From<RandomForestRegressor> for Regressor {
    fn from(model: RandomForestRegressor) -> Self {
        Regressor::RandomForest(model)
    }
}

impl From<LinearRegressor> for Regressor {
    fn from(model: LinearRegressor) -> Self {
        Regressor::Linear(model)
    }
}

impl InferenceModel for Regressor {
    type ParamsRepr = RegressorParams;

    fn n_features(&self) -> usize {
        match self {
            Regressor::RandomForest(m) => m.n_features(),
            Regressor::Linear(m) => m.n_features(),
        }
    }

    fn predict(&self, input: ArrayView1<'_, f64>) -> Result<f64> {
        match self {
            Regressor::RandomForest(m) => m.predict(input),
            Regressor::Linear(m) => m.predict(input),
        }
    }

    fn predict_batch(&self, input: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        match self {
            Regressor::RandomForest(m) => m.predict_batch(input),
            Regressor::Linear(m) => m.predict_batch(input),
        }
    }

    fn extract_params(&self) -> RegressorParams {
        match self {
            Regressor::RandomForest(m) => RegressorParams::RandomForest(m.extract_params()),
            Regressor::Linear(m) => RegressorParams::Linear(m.extract_params()),
        }
    }

    fn from_params(params: RegressorParams) -> Result<Self> {
        Ok(match params {
            RegressorParams::RandomForest(p) => {
                Regressor::RandomForest(RandomForestRegressor::from_params(p)?)
            }
            RegressorParams::Linear(p) => Regressor::Linear(LinearRegressor::from_params(p)?),
        })
    }
}
