// src/aggregator/symptoms.rs
use anyhow::Result;

use super::{phase_confidence, regress};
use crate::features::UseCase;
use crate::models::{
    Confidence, CycleProfile, SymptomDescriptions, SymptomForecast, TopSymptom,
};
use crate::phase::classify_phase;
use crate::predictors::{PredictorRegistry, PredictorSlot};
use crate::utils::round_to;

pub const MAX_INTENSITY: f64 = 10.0;
/// Symptoms ranked for `top_symptoms`.
pub const TOP_SYMPTOM_COUNT: usize = 2;

/// Predictor output order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymptomIntensities {
    pub cramps: f64,
    pub flow: f64,
    pub fatigue: f64,
    pub mood: f64,
    pub overall: f64,
}

impl SymptomIntensities {
    /// Clamps each raw output into `[0, 10]`.
    pub fn from_outputs(outputs: &[f64; 5]) -> Self {
        let clamp = |v: f64| v.clamp(0.0, MAX_INTENSITY);
        Self {
            cramps: clamp(outputs[0]),
            flow: clamp(outputs[1]),
            fatigue: clamp(outputs[2]),
            mood: clamp(outputs[3]),
            overall: clamp(outputs[4]),
        }
    }
}

pub fn describe_intensity(intensity: f64) -> &'static str {
    if intensity <= 2.0 {
        "None to minimal"
    } else if intensity <= 4.0 {
        "Mild"
    } else if intensity <= 6.0 {
        "Moderate"
    } else if intensity <= 8.0 {
        "Strong"
    } else {
        "Severe"
    }
}

/// The most intense of cramps, fatigue and mood changes, highest first.
/// Ties keep that listing order.
pub fn top_symptoms(intensities: &SymptomIntensities) -> Vec<TopSymptom> {
    let mut ranked = vec![
        ("cramps", intensities.cramps),
        ("fatigue", intensities.fatigue),
        ("mood_changes", intensities.mood),
    ];
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
        .into_iter()
        .take(TOP_SYMPTOM_COUNT)
        .map(|(name, intensity)| TopSymptom {
            name: name.to_string(),
            intensity: round_to(intensity, 1),
            description: describe_intensity(intensity).to_string(),
        })
        .collect()
}

/// Assembles the forecast from already-clamped intensities.
pub fn forecast(
    intensities: SymptomIntensities,
    profile: &CycleProfile,
    confidence: Option<Confidence>,
    model_accuracy: &str,
) -> SymptomForecast {
    let phase = classify_phase(profile.cycle_day, profile.cycle_length, profile.menses_length);
    let overall = describe_intensity(intensities.overall);
    SymptomForecast {
        cramp_intensity: round_to(intensities.cramps, 1),
        flow_intensity: round_to(intensities.flow, 1),
        fatigue_level: round_to(intensities.fatigue, 1),
        mood_impact: round_to(intensities.mood, 1),
        overall_discomfort: round_to(intensities.overall, 1),
        descriptions: SymptomDescriptions {
            cramps: describe_intensity(intensities.cramps).to_string(),
            flow: describe_intensity(intensities.flow).to_string(),
            fatigue: describe_intensity(intensities.fatigue).to_string(),
            mood: describe_intensity(intensities.mood).to_string(),
            overall: overall.to_string(),
        },
        top_symptoms: top_symptoms(&intensities),
        confidence: confidence.unwrap_or_else(|| phase_confidence(phase.phase)),
        explanation: format!(
            "{} overall discomfort expected ({} phase)",
            overall,
            phase.phase.as_str()
        ),
        phase: phase.phase,
        phase_message: phase.message,
        model_accuracy: model_accuracy.to_string(),
    }
}

pub fn predict(registry: &PredictorRegistry, profile: &CycleProfile) -> Result<SymptomForecast> {
    let slot = PredictorSlot::SymptomPredictor;
    let outputs = regress(registry, slot, UseCase::Symptoms, profile)?;
    let outputs: [f64; 5] = outputs
        .try_into()
        .map_err(|v: Vec<f64>| anyhow::anyhow!("Expected 5 symptom outputs, got {}", v.len()))?;
    Ok(forecast(
        SymptomIntensities::from_outputs(&outputs),
        profile,
        None,
        slot.accuracy_label(),
    ))
}
