// src/predictors/mod.rs
//! Pre-trained predictors and the registry that holds them.
//!
//! A predictor is an opaque, immutable capability. Each one is loaded once at
//! start-up from its parameter file and then shared across threads as
//! `Arc<dyn Regressor>` or `Arc<dyn Classifier>`.

pub mod forest;
pub mod linear;
pub mod loader;
pub mod registry;

use anyhow::Result;
use std::fmt;

use crate::features::{self, FeatureMetadata, FeatureVector, UseCase};

pub use registry::PredictorRegistry;

/// Feature vector -> one value per output.
pub trait Regressor: Send + Sync {
    fn output_len(&self) -> usize;
    fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>>;
}

/// Feature vector -> binary label and positive-class probability.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<u8>;
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredictorSlot {
    CycleLength,
    MensesLength,
    NextPeriod,
    IrregularCycle,
    SymptomPredictor,
}

impl PredictorSlot {
    pub const ALL: [PredictorSlot; 5] = [
        PredictorSlot::CycleLength,
        PredictorSlot::MensesLength,
        PredictorSlot::NextPeriod,
        PredictorSlot::IrregularCycle,
        PredictorSlot::SymptomPredictor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictorSlot::CycleLength => "cycle_length",
            PredictorSlot::MensesLength => "menses_length",
            PredictorSlot::NextPeriod => "next_period",
            PredictorSlot::IrregularCycle => "irregular_cycle",
            PredictorSlot::SymptomPredictor => "symptom_predictor",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            PredictorSlot::CycleLength => "cycle_length_model.json",
            PredictorSlot::MensesLength => "menses_length_model.json",
            PredictorSlot::NextPeriod => "next_period_predictor.json",
            PredictorSlot::IrregularCycle => "irregular_cycle_detector.json",
            PredictorSlot::SymptomPredictor => "symptom_predictor.json",
        }
    }

    /// Human-readable name used in "not loaded" errors.
    pub fn display_name(&self) -> &'static str {
        match self {
            PredictorSlot::CycleLength => "Cycle length",
            PredictorSlot::MensesLength => "Menses length",
            PredictorSlot::NextPeriod => "Next period",
            PredictorSlot::IrregularCycle => "Irregular cycle",
            PredictorSlot::SymptomPredictor => "Symptom predictor",
        }
    }

    /// Key under which the health report lists this slot.
    pub fn health_key(&self) -> &'static str {
        match self {
            PredictorSlot::CycleLength => "cycle_length",
            PredictorSlot::MensesLength => "menses_length",
            PredictorSlot::NextPeriod => "next_period",
            PredictorSlot::IrregularCycle => "irregular_detection",
            PredictorSlot::SymptomPredictor => "symptom_prediction",
        }
    }

    /// Offline evaluation result of the shipped model for this slot.
    pub fn accuracy_label(&self) -> &'static str {
        match self {
            PredictorSlot::CycleLength => "0.09 days MAE",
            PredictorSlot::MensesLength => "0.26 days MAE",
            PredictorSlot::NextPeriod => "Backup model",
            PredictorSlot::IrregularCycle => "AUC 1.000",
            PredictorSlot::SymptomPredictor => "90%+ within 1 point",
        }
    }

    /// Columns the slot's file must declare, in order.
    pub fn schema(&self) -> &'static [FeatureMetadata] {
        match self {
            PredictorSlot::CycleLength => UseCase::CycleLength.schema(),
            PredictorSlot::MensesLength => UseCase::MensesLength.schema(),
            PredictorSlot::NextPeriod => &features::next_period::SCHEMA,
            PredictorSlot::IrregularCycle => UseCase::Irregularity.schema(),
            PredictorSlot::SymptomPredictor => UseCase::Symptoms.schema(),
        }
    }

    pub fn is_classifier(&self) -> bool {
        matches!(self, PredictorSlot::IrregularCycle)
    }

    /// Outputs a regressor in this slot must produce.
    pub fn expected_outputs(&self) -> usize {
        match self {
            PredictorSlot::SymptomPredictor => 5,
            _ => 1,
        }
    }
}

impl fmt::Display for PredictorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionError {
    NotLoaded(PredictorSlot),
    SchemaMismatch {
        slot: PredictorSlot,
        expected: Vec<String>,
        found: Vec<String>,
    },
    NonFiniteFeature {
        feature: &'static str,
        value: f64,
    },
    OutputArity {
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for PredictionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionError::NotLoaded(slot) => {
                write!(f, "{} model not loaded", slot.display_name())
            }
            PredictionError::SchemaMismatch {
                slot,
                expected,
                found,
            } => write!(
                f,
                "Feature names for {} do not match: expected {:?}, found {:?}",
                slot, expected, found
            ),
            PredictionError::NonFiniteFeature { feature, value } => {
                write!(f, "Feature {} is not finite ({})", feature, value)
            }
            PredictionError::OutputArity { expected, found } => {
                write!(f, "Expected {} predictor outputs, got {}", expected, found)
            }
        }
    }
}

impl std::error::Error for PredictionError {}

/// Checks that a vector matches the width a model was built for.
pub(crate) fn ensure_width(features: &FeatureVector, expected: usize) -> Result<()> {
    if features.len() != expected {
        anyhow::bail!(
            "Model expects {} features, but got {}",
            expected,
            features.len()
        );
    }
    Ok(())
}
