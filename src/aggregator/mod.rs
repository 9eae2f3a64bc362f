// src/aggregator/mod.rs
//! Per-use-case orchestration: derive features, run the predictor, post-process
//! the raw outputs and attach a confidence tier.
//!
//! Every entry point returns `anyhow::Result`; a missing predictor surfaces as
//! [`PredictionError::NotLoaded`] at the top of the error so the degradation
//! layer can tell it apart from other failures.

pub mod cycle_length;
pub mod irregularity;
pub mod menses_length;
pub mod next_period;
pub mod symptoms;

use anyhow::Result;
use log::debug;

use crate::features::{self, FeatureVector, UseCase};
use crate::models::{Confidence, CycleProfile};
use crate::phase::CyclePhase;
use crate::predictors::{PredictionError, PredictorRegistry, PredictorSlot};

/// Confidence from logged history: 3+ cycles high, 1+ medium.
pub fn history_confidence(cycles_logged: f64) -> Confidence {
    if cycles_logged >= 3.0 {
        Confidence::High
    } else if cycles_logged >= 1.0 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

pub fn phase_confidence(phase: CyclePhase) -> Confidence {
    if phase.is_high_signal() {
        Confidence::High
    } else {
        Confidence::Medium
    }
}

/// Derives a finite vector for `use_case`.
pub(crate) fn finite_features(use_case: UseCase, profile: &CycleProfile) -> Result<FeatureVector> {
    let vector = features::derive(use_case, profile);
    vector.ensure_finite()?;
    Ok(vector)
}

/// Runs the regressor in `slot`, checking its declared and actual arity.
pub(crate) fn regress(
    registry: &PredictorRegistry,
    slot: PredictorSlot,
    use_case: UseCase,
    profile: &CycleProfile,
) -> Result<Vec<f64>> {
    let model = registry.regressor(slot)?;
    let expected = slot.expected_outputs();
    if model.output_len() != expected {
        return Err(PredictionError::OutputArity {
            expected,
            found: model.output_len(),
        }
        .into());
    }
    let vector = finite_features(use_case, profile)?;
    let outputs = model.predict(&vector)?;
    if outputs.len() != expected {
        return Err(PredictionError::OutputArity {
            expected,
            found: outputs.len(),
        }
        .into());
    }
    if let Some(bad) = outputs.iter().find(|v| !v.is_finite()) {
        anyhow::bail!("{} produced a non-finite output ({})", slot, bad);
    }
    debug!("{} outputs: {:?}", slot, outputs);
    Ok(outputs)
}

/// Single-output convenience over [`regress`].
pub(crate) fn regress_scalar(
    registry: &PredictorRegistry,
    slot: PredictorSlot,
    use_case: UseCase,
    profile: &CycleProfile,
) -> Result<f64> {
    let outputs = regress(registry, slot, use_case, profile)?;
    outputs.first().copied().ok_or_else(|| {
        PredictionError::OutputArity {
            expected: 1,
            found: 0,
        }
        .into()
    })
}

#[cfg(test)]
pub(crate) mod testing {
    //! Deterministic stand-ins for trained predictors.
    use anyhow::Result;

    use crate::features::FeatureVector;
    use crate::predictors::{Classifier, Regressor};

    pub struct FixedRegressor(pub Vec<f64>);

    impl Regressor for FixedRegressor {
        fn output_len(&self) -> usize {
            self.0.len()
        }
        fn predict(&self, _features: &FeatureVector) -> Result<Vec<f64>> {
            Ok(self.0.clone())
        }
    }

    pub struct FixedClassifier(pub f64);

    impl Classifier for FixedClassifier {
        fn predict(&self, _features: &FeatureVector) -> Result<u8> {
            Ok(u8::from(self.0 > 0.5))
        }
        fn predict_proba(&self, _features: &FeatureVector) -> Result<f64> {
            Ok(self.0)
        }
    }

    /// Fails every call.
    pub struct BrokenRegressor;

    impl Regressor for BrokenRegressor {
        fn output_len(&self) -> usize {
            1
        }
        fn predict(&self, _features: &FeatureVector) -> Result<Vec<f64>> {
            anyhow::bail!("inference backend unavailable")
        }
    }
}
