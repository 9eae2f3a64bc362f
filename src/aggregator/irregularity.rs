// src/aggregator/irregularity.rs
use anyhow::Result;
use log::debug;

use super::history_confidence;
use crate::features::IrregularityIndicators;
use crate::models::{CycleProfile, IrregularityAssessment};
use crate::predictors::{PredictorRegistry, PredictorSlot};
use crate::risk;
use crate::utils::round_to;

/// Classifier verdict plus rule-based risk scoring on the same indicators.
pub fn assess(registry: &PredictorRegistry, profile: &CycleProfile) -> Result<IrregularityAssessment> {
    let slot = PredictorSlot::IrregularCycle;
    let model = registry.classifier(slot)?;

    let indicators = IrregularityIndicators::from_profile(profile);
    let vector = indicators.to_vector();
    vector.ensure_finite()?;

    let probability = model.predict_proba(&vector)?;
    if !probability.is_finite() {
        anyhow::bail!("{} produced a non-finite probability", slot);
    }
    let label = model.predict(&vector)?;

    let score = risk::score(&indicators);
    let advisories = risk::advisories(&indicators);
    debug!(
        "Irregularity: p={:.3} label={} pcos={} hormonal={:.2}",
        probability, label, score.pcos_risk_score, score.hormonal_imbalance_score
    );

    Ok(IrregularityAssessment {
        is_irregular: label == 1,
        irregular_probability: round_to(probability, 3),
        risk_level: risk::probability_risk_level(probability),
        warnings: advisories.warnings,
        recommendations: advisories.recommendations,
        pcos_risk_score: score.pcos_risk_score,
        pcos_risk_level: score.pcos_risk_level,
        hormonal_imbalance_score: round_to(score.hormonal_imbalance_score, 2),
        hormonal_imbalance_level: score.hormonal_imbalance_level,
        cycle_variability: round_to(indicators.cycle_variability, 1),
        confidence: history_confidence(profile.cycles_logged),
        model_accuracy: slot.accuracy_label().to_string(),
        explanation: format!(
            "{} of 4 PCOS indicators present; irregularity probability {:.0}%",
            score.pcos_risk_score,
            probability * 100.0
        ),
    })
}
