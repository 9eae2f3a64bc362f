// src/predictors/linear.rs
use anyhow::{anyhow, Context, Result};
use ndarray::{Array1, Array2};

use super::{ensure_width, Classifier, Regressor};
use crate::features::FeatureVector;

/// Multi-output linear model: `y = W x + b`, one row of `W` per output.
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    weights: Array2<f64>,
    intercepts: Array1<f64>,
}

impl LinearRegressor {
    pub fn new(weights: Vec<Vec<f64>>, intercepts: Vec<f64>) -> Result<Self> {
        let outputs = weights.len();
        if outputs == 0 {
            return Err(anyhow!("Linear model has no outputs"));
        }
        if intercepts.len() != outputs {
            return Err(anyhow!(
                "Linear model has {} weight rows but {} intercepts",
                outputs,
                intercepts.len()
            ));
        }
        let width = weights[0].len();
        if let Some(row) = weights.iter().position(|row| row.len() != width) {
            return Err(anyhow!(
                "Weight row {} has {} values, expected {}",
                row,
                weights[row].len(),
                width
            ));
        }
        let flat: Vec<f64> = weights.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((outputs, width), flat)
            .context("Failed to shape linear model weights")?;
        Ok(Self {
            weights,
            intercepts: Array1::from(intercepts),
        })
    }

    pub fn feature_count(&self) -> usize {
        self.weights.ncols()
    }
}

impl Regressor for LinearRegressor {
    fn output_len(&self) -> usize {
        self.weights.nrows()
    }

    fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        ensure_width(features, self.feature_count())?;
        let x = Array1::from(features.values().to_vec());
        Ok((self.weights.dot(&x) + &self.intercepts).to_vec())
    }
}

/// Binary logistic model. Labels 1 when the probability exceeds `threshold`.
#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    weights: Array1<f64>,
    intercept: f64,
    threshold: f64,
}

impl LogisticClassifier {
    pub fn new(weights: Vec<f64>, intercept: f64, threshold: f64) -> Result<Self> {
        if weights.is_empty() {
            return Err(anyhow!("Logistic model has no weights"));
        }
        if !(0.0..=1.0).contains(&threshold) {
            return Err(anyhow!("Decision threshold {} is outside [0, 1]", threshold));
        }
        Ok(Self {
            weights: Array1::from(weights),
            intercept,
            threshold,
        })
    }

    pub fn feature_count(&self) -> usize {
        self.weights.len()
    }
}

pub fn sigmoid(logit: f64) -> f64 {
    1.0 / (1.0 + (-logit).exp())
}

impl Classifier for LogisticClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<u8> {
        let proba = self.predict_proba(features)?;
        Ok(u8::from(proba > self.threshold))
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<f64> {
        ensure_width(features, self.feature_count())?;
        let x = Array1::from(features.values().to_vec());
        Ok(sigmoid(self.weights.dot(&x) + self.intercept))
    }
}
