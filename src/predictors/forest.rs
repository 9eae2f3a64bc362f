// src/predictors/forest.rs
//! Tree-ensemble predictors. Trees are flat node arrays; the root is node 0 and
//! every child index points further into the array, so evaluation always
//! terminates.

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

use super::{ensure_width, Classifier, Regressor};
use crate::features::FeatureVector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// `x[feature] <= threshold` goes left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn validate(&self, feature_count: usize, outputs: usize) -> Result<()> {
        if self.nodes.is_empty() {
            bail!("Tree has no nodes");
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= feature_count {
                        bail!("Node {} splits on feature {} of {}", i, feature, feature_count);
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            bail!("Node {} has invalid child index {}", i, child);
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != outputs {
                        bail!("Leaf {} has {} values, expected {}", i, value.len(), outputs);
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, x: &[f64]) -> Result<&[f64]> {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = x
                        .get(*feature)
                        .ok_or_else(|| anyhow!("Feature index {} out of range", feature))?;
                    index = if *value <= *threshold { *left } else { *right };
                }
                None => bail!("Tree node {} does not exist", index),
            }
        }
    }
}

/// Averages the leaf outputs of every tree.
#[derive(Debug, Clone)]
pub struct ForestRegressor {
    trees: Vec<RegressionTree>,
    feature_count: usize,
    outputs: usize,
}

impl ForestRegressor {
    pub fn new(trees: Vec<RegressionTree>, feature_count: usize, outputs: usize) -> Result<Self> {
        if trees.is_empty() {
            bail!("Forest has no trees");
        }
        if outputs == 0 {
            bail!("Forest has no outputs");
        }
        for (i, tree) in trees.iter().enumerate() {
            tree.validate(feature_count, outputs)
                .map_err(|e| anyhow!("Tree {}: {}", i, e))?;
        }
        Ok(Self {
            trees,
            feature_count,
            outputs,
        })
    }

    fn average(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        ensure_width(features, self.feature_count)?;
        let x = features.values();
        let mut sums = vec![0.0; self.outputs];
        for tree in &self.trees {
            for (sum, v) in sums.iter_mut().zip(tree.evaluate(x)?) {
                *sum += v;
            }
        }
        let n = self.trees.len() as f64;
        Ok(sums.into_iter().map(|s| s / n).collect())
    }
}

impl Regressor for ForestRegressor {
    fn output_len(&self) -> usize {
        self.outputs
    }

    fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        self.average(features)
    }
}

/// Forest whose single-output leaves hold positive-class probabilities.
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    forest: ForestRegressor,
    threshold: f64,
}

impl ForestClassifier {
    pub fn new(trees: Vec<RegressionTree>, feature_count: usize, threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            bail!("Decision threshold {} is outside [0, 1]", threshold);
        }
        Ok(Self {
            forest: ForestRegressor::new(trees, feature_count, 1)?,
            threshold,
        })
    }
}

impl Classifier for ForestClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<u8> {
        let proba = self.predict_proba(features)?;
        Ok(u8::from(proba > self.threshold))
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<f64> {
        let averaged = self.forest.average(features)?;
        let proba = averaged
            .first()
            .copied()
            .ok_or_else(|| anyhow!("Forest produced no output"))?;
        Ok(proba.clamp(0.0, 1.0))
    }
}
