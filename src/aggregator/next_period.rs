// src/aggregator/next_period.rs
use anyhow::Result;

use super::{history_confidence, regress_scalar};
use crate::features::UseCase;
use crate::models::{CycleProfile, NextPeriodPrediction};
use crate::predictors::{PredictorRegistry, PredictorSlot};
use crate::utils::round_to;

/// Days left in the predicted cycle. A day past the predicted length wraps
/// into the following cycle. At least 1.
pub fn days_until_next_period(predicted_cycle_length: f64, current_cycle_day: f64) -> i64 {
    let mut days = predicted_cycle_length - current_cycle_day;
    if days <= 0.0 {
        days += predicted_cycle_length;
    }
    (days.floor() as i64).max(1)
}

/// Next-period timing, driven by the cycle-length predictor.
pub fn predict(registry: &PredictorRegistry, profile: &CycleProfile) -> Result<NextPeriodPrediction> {
    let slot = PredictorSlot::CycleLength;
    let predicted = regress_scalar(registry, slot, UseCase::CycleLength, profile)?;
    let days = days_until_next_period(predicted, profile.cycle_day);
    Ok(NextPeriodPrediction {
        days_until_next_period: days,
        predicted_cycle_length: round_to(predicted, 1),
        confidence: history_confidence(profile.cycles_logged),
        model_accuracy: slot.accuracy_label().to_string(),
        explanation: format!(
            "Next period in {} days (based on {:.1}-day cycle)",
            days, predicted
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::testing::FixedRegressor;
    use crate::models::Confidence;
    use std::sync::Arc;

    #[test]
    fn test_wraps_past_predicted_length() {
        assert_eq!(days_until_next_period(28.0, 30.0), 26);
        assert_eq!(days_until_next_period(28.0, 28.0), 28);
        assert_eq!(days_until_next_period(28.0, 1.0), 27);
    }

    #[test]
    fn test_at_least_one_day() {
        assert_eq!(days_until_next_period(28.0, 27.5), 1);
        assert_eq!(days_until_next_period(28.0, 56.0), 1);
        for day in 0..100 {
            assert!(days_until_next_period(27.3, day as f64) >= 1);
        }
    }

    #[test]
    fn test_next_period_from_cycle_model() {
        let registry = PredictorRegistry::empty()
            .with_regressor(PredictorSlot::CycleLength, Arc::new(FixedRegressor(vec![28.0])));
        let profile = CycleProfile {
            cycle_day: 30.0,
            cycles_logged: 4.0,
            ..CycleProfile::default()
        };
        let result = predict(&registry, &profile).unwrap();
        assert_eq!(result.days_until_next_period, 26);
        assert_eq!(result.predicted_cycle_length, 28.0);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(
            result.explanation,
            "Next period in 26 days (based on 28.0-day cycle)"
        );
    }
}
