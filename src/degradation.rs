// src/degradation.rs
//! Fallback policy. Every operation runs inside [`serve`]; whatever goes wrong,
//! the caller gets a payload of the same shape with confidence `low`.

use anyhow::Result;
use log::{debug, error, warn};
use std::panic::{self, AssertUnwindSafe};

use crate::aggregator::symptoms::{self, SymptomIntensities};
use crate::models::{
    Confidence, CycleLengthPrediction, CycleProfile, IrregularityAssessment,
    MensesLengthPrediction, NextPeriodPrediction, Prediction, RiskLevel, SymptomForecast,
};
use crate::predictors::PredictionError;

pub const FALLBACK_ACCURACY: &str = "fallback";
pub const FALLBACK_CYCLE_LENGTH: f64 = 28.0;
pub const FALLBACK_MENSES_LENGTH: f64 = 5.0;
pub const FALLBACK_DAYS_UNTIL_PERIOD: i64 = 14;
/// Caller-facing error for a degraded response. The cause is only logged.
pub const DEGRADED_MESSAGE: &str = "Prediction failed; serving fallback values";
/// cramps, flow, fatigue, mood, overall
pub const FALLBACK_SYMPTOMS: [f64; 5] = [2.0, 0.0, 3.0, 2.0, 2.0];

/// Runs `attempt`, substituting `fallback()` on error or panic. Never retries.
pub fn serve<T>(
    operation: &str,
    attempt: impl FnOnce() -> Result<T>,
    fallback: impl FnOnce() -> T,
) -> Prediction<T> {
    match panic::catch_unwind(AssertUnwindSafe(attempt)) {
        Ok(Ok(payload)) => {
            debug!("{} served", operation);
            Prediction::served(payload)
        }
        Ok(Err(e)) => match e.downcast_ref::<PredictionError>() {
            Some(not_loaded @ PredictionError::NotLoaded(_)) => {
                warn!("⚠️ {}: {}", operation, not_loaded);
                Prediction::not_loaded(fallback(), not_loaded.to_string())
            }
            _ => {
                error!("❌ {} failed: {:#}", operation, e);
                Prediction::degraded(fallback(), DEGRADED_MESSAGE)
            }
        },
        Err(_) => {
            error!("❌ {} panicked; serving fallback", operation);
            Prediction::degraded(fallback(), DEGRADED_MESSAGE)
        }
    }
}

pub fn cycle_length_fallback() -> CycleLengthPrediction {
    CycleLengthPrediction {
        predicted_cycle_length: FALLBACK_CYCLE_LENGTH,
        confidence: Confidence::Low,
        model_accuracy: FALLBACK_ACCURACY.to_string(),
        explanation: format!("Using the typical {:.1}-day cycle", FALLBACK_CYCLE_LENGTH),
    }
}

pub fn menses_length_fallback() -> MensesLengthPrediction {
    MensesLengthPrediction {
        predicted_menses_length: FALLBACK_MENSES_LENGTH,
        confidence: Confidence::Low,
        model_accuracy: FALLBACK_ACCURACY.to_string(),
        explanation: format!("Using the typical {:.1}-day period", FALLBACK_MENSES_LENGTH),
    }
}

pub fn next_period_fallback() -> NextPeriodPrediction {
    NextPeriodPrediction {
        days_until_next_period: FALLBACK_DAYS_UNTIL_PERIOD,
        predicted_cycle_length: FALLBACK_CYCLE_LENGTH,
        confidence: Confidence::Low,
        model_accuracy: FALLBACK_ACCURACY.to_string(),
        explanation: format!(
            "Next period in {} days (based on {:.1}-day cycle)",
            FALLBACK_DAYS_UNTIL_PERIOD, FALLBACK_CYCLE_LENGTH
        ),
    }
}

pub fn irregularity_fallback() -> IrregularityAssessment {
    IrregularityAssessment {
        is_irregular: false,
        irregular_probability: 0.0,
        risk_level: RiskLevel::Low,
        warnings: Vec::new(),
        recommendations: Vec::new(),
        pcos_risk_score: 0,
        pcos_risk_level: RiskLevel::Low,
        hormonal_imbalance_score: 0.0,
        hormonal_imbalance_level: RiskLevel::Low,
        cycle_variability: 0.0,
        confidence: Confidence::Low,
        model_accuracy: FALLBACK_ACCURACY.to_string(),
        explanation: "Irregularity could not be assessed".to_string(),
    }
}

/// Typical intensities, with the phase still computed from the request.
pub fn symptoms_fallback(profile: &CycleProfile) -> SymptomForecast {
    symptoms::forecast(
        SymptomIntensities::from_outputs(&FALLBACK_SYMPTOMS),
        profile,
        Some(Confidence::Low),
        FALLBACK_ACCURACY,
    )
}
