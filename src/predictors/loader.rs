// src/predictors/loader.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::forest::{ForestClassifier, ForestRegressor, RegressionTree};
use super::linear::{LinearRegressor, LogisticClassifier};
use super::{Classifier, PredictionError, PredictorSlot, Regressor};

fn default_threshold() -> f64 {
    0.5
}

/// On-disk parameter file, tagged by `model_type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "model_type", rename_all = "lowercase")]
pub enum ModelFile {
    Linear {
        feature_names: Vec<String>,
        weights: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
    Logistic {
        feature_names: Vec<String>,
        weights: Vec<f64>,
        intercept: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    Forest {
        feature_names: Vec<String>,
        trees: Vec<RegressionTree>,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
}

impl ModelFile {
    pub fn feature_names(&self) -> &[String] {
        match self {
            ModelFile::Linear { feature_names, .. }
            | ModelFile::Logistic { feature_names, .. }
            | ModelFile::Forest { feature_names, .. } => feature_names,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModelFile::Linear { .. } => "linear",
            ModelFile::Logistic { .. } => "logistic",
            ModelFile::Forest { .. } => "forest",
        }
    }
}

pub enum LoadedPredictor {
    Regressor(Arc<dyn Regressor>),
    Classifier(Arc<dyn Classifier>),
}

/// Rejects a file whose declared columns differ from the slot's schema.
fn check_feature_names(slot: PredictorSlot, file: &ModelFile) -> Result<()> {
    let found = file.feature_names();
    let expected: Vec<String> = slot
        .schema()
        .iter()
        .map(|meta| meta.name.to_string())
        .collect();
    if found != expected.as_slice() {
        return Err(PredictionError::SchemaMismatch {
            slot,
            expected,
            found: found.to_vec(),
        }
        .into());
    }
    Ok(())
}

pub fn build_predictor(slot: PredictorSlot, file: ModelFile) -> Result<LoadedPredictor> {
    check_feature_names(slot, &file)?;
    let feature_count = file.feature_names().len();
    let kind = file.kind();

    if slot.is_classifier() {
        let classifier: Arc<dyn Classifier> = match file {
            ModelFile::Logistic {
                weights,
                intercept,
                threshold,
                ..
            } => {
                if weights.len() != feature_count {
                    bail!(
                        "Logistic model has {} weights for {} features",
                        weights.len(),
                        feature_count
                    );
                }
                Arc::new(LogisticClassifier::new(weights, intercept, threshold)?)
            }
            ModelFile::Forest {
                trees, threshold, ..
            } => Arc::new(ForestClassifier::new(trees, feature_count, threshold)?),
            ModelFile::Linear { .. } => {
                bail!("{} needs a classifier, found a {} model", slot, kind)
            }
        };
        return Ok(LoadedPredictor::Classifier(classifier));
    }

    let expected = slot.expected_outputs();
    let regressor: Arc<dyn Regressor> = match file {
        ModelFile::Linear {
            weights,
            intercepts,
            ..
        } => {
            if weights.len() != expected {
                return Err(PredictionError::OutputArity {
                    expected,
                    found: weights.len(),
                }
                .into());
            }
            let model = LinearRegressor::new(weights, intercepts)?;
            if model.feature_count() != feature_count {
                bail!(
                    "Linear model has {} columns for {} features",
                    model.feature_count(),
                    feature_count
                );
            }
            Arc::new(model)
        }
        ModelFile::Forest { trees, .. } => {
            Arc::new(ForestRegressor::new(trees, feature_count, expected)?)
        }
        ModelFile::Logistic { .. } => {
            bail!("{} needs a regressor, found a {} model", slot, kind)
        }
    };
    Ok(LoadedPredictor::Regressor(regressor))
}

pub fn load_predictor(slot: PredictorSlot, path: &Path) -> Result<LoadedPredictor> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read model file {}", path.display()))?;
    let file: ModelFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse model file {}", path.display()))?;
    build_predictor(slot, file).map_err(|e| anyhow!("Invalid {} model: {:#}", slot, e))
}
