//! Random forest regression.
//!
//! Trees are stored as flat node arrays in pre-order, the layout scikit-learn
//! exports: node 0 is the root, every split sends `x[feature] <= threshold` to
//! `left` and everything else to `right`, and children always come after
//! their parent. That last property is what makes traversal terminate, so it
//! is checked on load.

use super::{check_input_len, InferenceModel};
use crate::error::{PriceError, Result};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// A node of a regression tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A single validated regression tree.
#[derive(Clone, Debug)]
pub struct DecisionTreeRegressor {
    nodes: Vec<TreeNode>,
    n_features: usize,
}

impl DecisionTreeRegressor {
    /// Validate a node array against the number of input features.
    pub fn new(nodes: Vec<TreeNode>, n_features: usize) -> Result<Self> {
        if nodes.is_empty() {
            return Err(PriceError::InvalidParameter("tree has no nodes".to_string()));
        }
        for (idx, node) in nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(PriceError::InvalidParameter(format!(
                            "node {} splits on feature {} but rows have {}",
                            idx, feature, n_features
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(PriceError::InvalidParameter(format!(
                            "node {} has non-finite threshold",
                            idx
                        )));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= nodes.len() {
                            return Err(PriceError::InvalidParameter(format!(
                                "node {} has invalid child {} (tree has {} nodes)",
                                idx,
                                child,
                                nodes.len()
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(PriceError::InvalidParameter(format!(
                            "leaf {} has non-finite value",
                            idx
                        )));
                    }
                }
            }
        }
        Ok(Self { nodes, n_features })
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Row width the tree was validated against.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Walk from the root to a leaf. The caller guarantees the row width.
    fn leaf_value(&self, input: &ArrayView1<'_, f64>) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if input[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

/// Serializable parameters of a random forest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomForestParams {
    pub n_features: usize,
    pub trees: Vec<Vec<TreeNode>>,
}

/// Averaging ensemble of regression trees.
#[derive(Clone, Debug)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTreeRegressor>,
    n_features: usize,
}

impl RandomForestRegressor {
    pub fn new(trees: Vec<DecisionTreeRegressor>, n_features: usize) -> Result<Self> {
        if trees.is_empty() {
            return Err(PriceError::InvalidParameter(
                "random forest has no trees".to_string(),
            ));
        }
        if let Some((i, tree)) = trees
            .iter()
            .enumerate()
            .find(|(_, t)| t.n_features != n_features)
        {
            return Err(PriceError::InvalidParameter(format!(
                "tree {} was built for {} features, forest takes {}",
                i, tree.n_features, n_features
            )));
        }
        Ok(Self { trees, n_features })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn trees(&self) -> &[DecisionTreeRegressor] {
        &self.trees
    }
}

impl InferenceModel for RandomForestRegressor {
    type ParamsRepr = RandomForestParams;

    fn n_features(&self) -> usize {
        self.n_features
    }

    /// Mean of the per-tree predictions.
    fn predict(&self, input: ArrayView1<'_, f64>) -> Result<f64> {
        check_input_len(self.n_features, &input)?;
        let sum: f64 = self.trees.iter().map(|t| t.leaf_value(&input)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    fn extract_params(&self) -> RandomForestParams {
        RandomForestParams {
            n_features: self.n_features,
            trees: self.trees.iter().map(|t| t.nodes.clone()).collect(),
        }
    }

    fn from_params(params: RandomForestParams) -> Result<Self> {
        let trees = params
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, nodes)| {
                DecisionTreeRegressor::new(nodes, params.n_features).map_err(|e| {
                    PriceError::InvalidParameter(format!("tree {}: {}", i, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(trees, params.n_features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn split(feature: usize, threshold: f64, left: usize, right: usize) -> TreeNode {
        TreeNode::Split {
            feature,
            threshold,
            left,
            right,
        }
    }

    fn leaf(value: f64) -> TreeNode {
        TreeNode::Leaf { value }
    }

    // x0 <= 1.5 ? (x1 <= 10 ? 1 : 2) : 3
    fn small_tree() -> DecisionTreeRegressor {
        DecisionTreeRegressor::new(
            vec![
                split(0, 1.5, 1, 4),
                split(1, 10.0, 2, 3),
                leaf(1.0),
                leaf(2.0),
                leaf(3.0),
            ],
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_tree_traversal() {
        let tree = small_tree();
        assert_eq!(tree.leaf_value(&array![1.0, 5.0].view()), 1.0);
        assert_eq!(tree.leaf_value(&array![1.0, 20.0].view()), 2.0);
        assert_eq!(tree.leaf_value(&array![2.0, 5.0].view()), 3.0);
    }

    #[test]
    fn test_threshold_is_inclusive_left() {
        let tree = small_tree();
        assert_eq!(tree.leaf_value(&array![1.5, 10.0].view()), 1.0);
    }

    #[test]
    fn test_forest_is_mean_of_trees() {
        let stump = DecisionTreeRegressor::new(vec![leaf(6.0)], 2).unwrap();
        let forest = RandomForestRegressor::new(vec![small_tree(), stump], 2).unwrap();
        assert_eq!(forest.n_trees(), 2);
        assert_eq!(forest.predict(array![1.0, 5.0].view()).unwrap(), 3.5);
        assert_eq!(forest.predict(array![2.0, 5.0].view()).unwrap(), 4.5);
    }

    #[test]
    fn test_forest_batch() {
        let forest = RandomForestRegressor::new(vec![small_tree()], 2).unwrap();
        let x = array![[1.0, 5.0], [1.0, 20.0], [9.0, 0.0]];
        let y = forest.predict_batch(x.view()).unwrap();
        assert_eq!(y.to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_forest_rejects_wrong_width() {
        let forest = RandomForestRegressor::new(vec![small_tree()], 2).unwrap();
        assert!(matches!(
            forest.predict(array![1.0].view()),
            Err(PriceError::Inference(_))
        ));
    }

    #[test]
    fn test_tree_validation() {
        assert!(DecisionTreeRegressor::new(vec![], 2).is_err());
        // child pointing back at its parent
        assert!(DecisionTreeRegressor::new(vec![split(0, 1.0, 0, 1), leaf(1.0)], 2).is_err());
        // child out of bounds
        assert!(DecisionTreeRegressor::new(vec![split(0, 1.0, 1, 5), leaf(1.0)], 2).is_err());
        // feature out of range
        assert!(
            DecisionTreeRegressor::new(vec![split(7, 1.0, 1, 2), leaf(1.0), leaf(2.0)], 7)
                .is_err()
        );
        assert!(DecisionTreeRegressor::new(vec![leaf(f64::NAN)], 2).is_err());
        assert!(
            DecisionTreeRegressor::new(vec![split(0, f64::INFINITY, 1, 2), leaf(1.0), leaf(2.0)], 2)
                .is_err()
        );
    }

    #[test]
    fn test_forest_rejects_tree_of_other_width() {
        let wide = DecisionTreeRegressor::new(vec![split(9, 1.0, 1, 2), leaf(1.0), leaf(2.0)], 10)
            .unwrap();
        let err = RandomForestRegressor::new(vec![wide], 7).unwrap_err();
        assert!(matches!(err, PriceError::InvalidParameter(_)));

        let narrow = DecisionTreeRegressor::new(vec![leaf(1.0)], 2).unwrap();
        assert!(RandomForestRegressor::new(vec![small_tree(), narrow.clone()], 2).is_ok());
        assert!(RandomForestRegressor::new(vec![narrow], 7).is_err());
    }

    #[test]
    fn test_empty_forest_rejected() {
        assert!(RandomForestRegressor::new(vec![], 7).is_err());
        let params = RandomForestParams {
            n_features: 7,
            trees: vec![],
        };
        assert!(RandomForestRegressor::from_params(params).is_err());
    }

    #[test]
    fn test_forest_params_round_trip() {
        let forest = RandomForestRegressor::new(vec![small_tree()], 2).unwrap();
        let params = forest.extract_params();
        let rebuilt = RandomForestRegressor::from_params(params.clone()).unwrap();
        assert_eq!(rebuilt.extract_params(), params);
    }
}
