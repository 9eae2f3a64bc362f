// src/aggregator/menses_length.rs
use anyhow::Result;

use super::regress_scalar;
use crate::features::UseCase;
use crate::models::{Confidence, CycleProfile, MensesLengthPrediction};
use crate::predictors::{PredictorRegistry, PredictorSlot};
use crate::utils::round_to;

pub fn predict(registry: &PredictorRegistry, profile: &CycleProfile) -> Result<MensesLengthPrediction> {
    let slot = PredictorSlot::MensesLength;
    let predicted = regress_scalar(registry, slot, UseCase::MensesLength, profile)?;
    Ok(MensesLengthPrediction {
        predicted_menses_length: round_to(predicted, 1),
        confidence: Confidence::High,
        model_accuracy: slot.accuracy_label().to_string(),
        explanation: format!("Your period length: {:.1} days", predicted),
    })
}
