// src/aggregator/cycle_length.rs
use anyhow::Result;

use super::regress_scalar;
use crate::features::UseCase;
use crate::models::{Confidence, CycleLengthPrediction, CycleProfile};
use crate::predictors::{PredictorRegistry, PredictorSlot};
use crate::utils::round_to;

pub fn predict(registry: &PredictorRegistry, profile: &CycleProfile) -> Result<CycleLengthPrediction> {
    let slot = PredictorSlot::CycleLength;
    let predicted = regress_scalar(registry, slot, UseCase::CycleLength, profile)?;
    Ok(CycleLengthPrediction {
        predicted_cycle_length: round_to(predicted, 1),
        confidence: Confidence::High,
        model_accuracy: slot.accuracy_label().to_string(),
        explanation: format!("Your cycle length: {:.1} days", predicted),
    })
}
