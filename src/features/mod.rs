// src/features/mod.rs
//! Feature derivation: request profile -> the exact ordered vector a predictor
//! was trained on.
//!
//! Schemas are fixed-size arrays, so a derivation that produces the wrong
//! number of values does not compile. Column order matches training and must
//! not be changed.

pub mod cycle_length;
pub mod irregularity;
pub mod menses_length;
pub mod next_period;
pub mod symptoms;

use crate::models::CycleProfile;
use crate::predictors::PredictionError;

pub use irregularity::IrregularityIndicators;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureMetadata {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseCase {
    CycleLength,
    MensesLength,
    Irregularity,
    Symptoms,
}

impl UseCase {
    pub fn schema(&self) -> &'static [FeatureMetadata] {
        match self {
            UseCase::CycleLength => &cycle_length::SCHEMA,
            UseCase::MensesLength => &menses_length::SCHEMA,
            UseCase::Irregularity => &irregularity::SCHEMA,
            UseCase::Symptoms => &symptoms::SCHEMA,
        }
    }
}

/// An ordered, named feature vector bound to its schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    schema: &'static [FeatureMetadata],
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new<const N: usize>(schema: &'static [FeatureMetadata; N], values: [f64; N]) -> Self {
        Self {
            schema,
            values: values.to_vec(),
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn schema(&self) -> &'static [FeatureMetadata] {
        self.schema
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.schema
            .iter()
            .position(|meta| meta.name == name)
            .map(|i| self.values[i])
    }

    /// Rejects vectors a predictor cannot evaluate meaningfully (e.g. a ratio
    /// over a zero cycle length).
    pub fn ensure_finite(&self) -> Result<(), PredictionError> {
        match self.values.iter().position(|v| !v.is_finite()) {
            Some(i) => Err(PredictionError::NonFiniteFeature {
                feature: self.schema[i].name,
                value: self.values[i],
            }),
            None => Ok(()),
        }
    }
}

/// Builds the vector for `use_case` from an already-defaulted profile.
pub fn derive(use_case: UseCase, profile: &CycleProfile) -> FeatureVector {
    match use_case {
        UseCase::CycleLength => cycle_length::derive(profile),
        UseCase::MensesLength => menses_length::derive(profile),
        UseCase::Irregularity => IrregularityIndicators::from_profile(profile).to_vector(),
        UseCase::Symptoms => symptoms::derive(profile),
    }
}
