// src/models/profile.rs
//! Typed request schemas for each operation.
//!
//! Field names follow the wire names each operation has always accepted. Every
//! field is optional and coerced leniently (see `utils::lenient`); defaults are
//! applied when a request is resolved into a [`CycleProfile`].

use serde::Deserialize;

use crate::utils::lenient;

pub const DEFAULT_AGE: f64 = 25.0;
pub const DEFAULT_BMI: f64 = 25.0;
pub const DEFAULT_CYCLE_LENGTH: f64 = 28.0;
pub const DEFAULT_MENSES_LENGTH: f64 = 5.0;
pub const DEFAULT_BLEEDING_INTENSITY: f64 = 5.0;
pub const DEFAULT_LUTEAL_PHASE_LENGTH: f64 = 14.0;
pub const DEFAULT_OVULATION_DAY: f64 = 14.0;
pub const DEFAULT_FERTILE_DAYS: f64 = 6.0;
pub const DEFAULT_PREGNANCIES: f64 = 0.0;
pub const DEFAULT_CYCLE_WITH_PEAK: f64 = 1.0;
pub const DEFAULT_CYCLE_DAY: f64 = 1.0;
pub const DEFAULT_CYCLES_LOGGED: f64 = 0.0;

/// The caller-supplied cycle state with every default applied.
///
/// Request-scoped and immutable; each operation reads only the attributes its
/// predictor was trained on.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleProfile {
    pub age: f64,
    pub bmi: f64,
    pub cycle_length: f64,
    pub menses_length: f64,
    pub bleeding_intensity: f64,
    pub luteal_phase_length: f64,
    pub ovulation_day: f64,
    pub fertile_days: f64,
    pub pregnancies: f64,
    pub unusual_bleeding: bool,
    /// 1 when an LH peak (ovulation) was observed in the cycle, 0 otherwise
    pub cycle_with_peak: f64,
    /// Most recent first
    pub recent_cycle_lengths: Vec<f64>,
    pub cycles_logged: f64,
    /// 1-based day within the current cycle
    pub cycle_day: f64,
}

impl Default for CycleProfile {
    fn default() -> Self {
        Self {
            age: DEFAULT_AGE,
            bmi: DEFAULT_BMI,
            cycle_length: DEFAULT_CYCLE_LENGTH,
            menses_length: DEFAULT_MENSES_LENGTH,
            bleeding_intensity: DEFAULT_BLEEDING_INTENSITY,
            luteal_phase_length: DEFAULT_LUTEAL_PHASE_LENGTH,
            ovulation_day: DEFAULT_OVULATION_DAY,
            fertile_days: DEFAULT_FERTILE_DAYS,
            pregnancies: DEFAULT_PREGNANCIES,
            unusual_bleeding: false,
            cycle_with_peak: DEFAULT_CYCLE_WITH_PEAK,
            recent_cycle_lengths: vec![DEFAULT_CYCLE_LENGTH],
            cycles_logged: DEFAULT_CYCLES_LOGGED,
            cycle_day: DEFAULT_CYCLE_DAY,
        }
    }
}

/// Input for `predict_cycle_length`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CycleLengthRequest {
    #[serde(rename = "LengthofMenses", default, deserialize_with = "lenient::number")]
    pub length_of_menses: Option<f64>,
    #[serde(rename = "Age", default, deserialize_with = "lenient::number")]
    pub age: Option<f64>,
    #[serde(rename = "BMI", default, deserialize_with = "lenient::number")]
    pub bmi: Option<f64>,
    #[serde(rename = "EstimatedDayofOvulation", default, deserialize_with = "lenient::number")]
    pub estimated_day_of_ovulation: Option<f64>,
    #[serde(rename = "LengthofLutealPhase", default, deserialize_with = "lenient::number")]
    pub length_of_luteal_phase: Option<f64>,
    #[serde(rename = "TotalDaysofFertility", default, deserialize_with = "lenient::number")]
    pub total_days_of_fertility: Option<f64>,
}

impl CycleLengthRequest {
    pub fn profile(&self) -> CycleProfile {
        let defaults = CycleProfile::default();
        CycleProfile {
            menses_length: self.length_of_menses.unwrap_or(defaults.menses_length),
            age: self.age.unwrap_or(defaults.age),
            bmi: self.bmi.unwrap_or(defaults.bmi),
            ovulation_day: self
                .estimated_day_of_ovulation
                .unwrap_or(defaults.ovulation_day),
            luteal_phase_length: self
                .length_of_luteal_phase
                .unwrap_or(defaults.luteal_phase_length),
            fertile_days: self
                .total_days_of_fertility
                .unwrap_or(defaults.fertile_days),
            ..defaults
        }
    }
}

/// Input for `predict_menses_length`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MensesLengthRequest {
    #[serde(rename = "Age", default, deserialize_with = "lenient::number")]
    pub age: Option<f64>,
    #[serde(rename = "BMI", default, deserialize_with = "lenient::number")]
    pub bmi: Option<f64>,
    #[serde(rename = "LengthofCycle", default, deserialize_with = "lenient::number")]
    pub length_of_cycle: Option<f64>,
    #[serde(rename = "MeanBleedingIntensity", default, deserialize_with = "lenient::number")]
    pub mean_bleeding_intensity: Option<f64>,
    #[serde(rename = "EstimatedDayofOvulation", default, deserialize_with = "lenient::number")]
    pub estimated_day_of_ovulation: Option<f64>,
}

impl MensesLengthRequest {
    pub fn profile(&self) -> CycleProfile {
        let defaults = CycleProfile::default();
        CycleProfile {
            age: self.age.unwrap_or(defaults.age),
            bmi: self.bmi.unwrap_or(defaults.bmi),
            cycle_length: self.length_of_cycle.unwrap_or(defaults.cycle_length),
            bleeding_intensity: self
                .mean_bleeding_intensity
                .unwrap_or(defaults.bleeding_intensity),
            ovulation_day: self
                .estimated_day_of_ovulation
                .unwrap_or(defaults.ovulation_day),
            ..defaults
        }
    }
}

/// Input for `predict_next_period`: the cycle-length fields plus the current position.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextPeriodRequest {
    #[serde(flatten)]
    pub cycle: CycleLengthRequest,
    #[serde(default, deserialize_with = "lenient::number")]
    pub current_cycle_day: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cycles_logged: Option<f64>,
}

impl NextPeriodRequest {
    pub fn profile(&self) -> CycleProfile {
        let base = self.cycle.profile();
        CycleProfile {
            cycle_day: self.current_cycle_day.unwrap_or(base.cycle_day),
            cycles_logged: self.cycles_logged.unwrap_or(base.cycles_logged),
            ..base
        }
    }
}

/// Input for `detect_irregular_cycle`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IrregularCycleRequest {
    #[serde(default, deserialize_with = "lenient::number_list")]
    pub recent_cycle_lengths: Option<Vec<f64>>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cycle_with_peak: Option<f64>,
    /// Boolean form of `cycle_with_peak`; takes precedence when present.
    #[serde(default, deserialize_with = "lenient::indicator")]
    pub ovulation_detected: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub luteal_phase_length: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub menses_length: Option<f64>,
    #[serde(default, deserialize_with = "lenient::indicator")]
    pub unusual_bleeding: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub bleeding_intensity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub age: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub bmi: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub number_pregnancies: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cycles_logged: Option<f64>,
}

impl IrregularCycleRequest {
    pub fn profile(&self) -> CycleProfile {
        let defaults = CycleProfile::default();
        let recent_cycle_lengths = self
            .recent_cycle_lengths
            .clone()
            .unwrap_or_else(|| defaults.recent_cycle_lengths.clone());
        // Without an explicit count, the history supplied is the history logged.
        let cycles_logged = self
            .cycles_logged
            .unwrap_or(self.recent_cycle_lengths.as_ref().map_or(0, Vec::len) as f64);
        CycleProfile {
            cycle_with_peak: self
                .ovulation_detected
                .or(self.cycle_with_peak)
                .unwrap_or(defaults.cycle_with_peak),
            luteal_phase_length: self
                .luteal_phase_length
                .unwrap_or(defaults.luteal_phase_length),
            menses_length: self.menses_length.unwrap_or(defaults.menses_length),
            unusual_bleeding: self.unusual_bleeding.unwrap_or(0.0) != 0.0,
            bleeding_intensity: self
                .bleeding_intensity
                .unwrap_or(defaults.bleeding_intensity),
            age: self.age.unwrap_or(defaults.age),
            bmi: self.bmi.unwrap_or(defaults.bmi),
            pregnancies: self.number_pregnancies.unwrap_or(defaults.pregnancies),
            cycle_length: recent_cycle_lengths
                .first()
                .copied()
                .unwrap_or(DEFAULT_CYCLE_LENGTH),
            recent_cycle_lengths,
            cycles_logged,
            ..defaults
        }
    }
}

/// Input for `predict_symptoms`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SymptomRequest {
    #[serde(default, deserialize_with = "lenient::number")]
    pub cycle_day: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cycle_length: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub menses_length: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub age: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub bmi: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub pregnancies: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub mean_bleeding_intensity: Option<f64>,
}

impl SymptomRequest {
    pub fn profile(&self) -> CycleProfile {
        let defaults = CycleProfile::default();
        CycleProfile {
            cycle_day: self.cycle_day.unwrap_or(defaults.cycle_day),
            cycle_length: self.cycle_length.unwrap_or(defaults.cycle_length),
            menses_length: self.menses_length.unwrap_or(defaults.menses_length),
            age: self.age.unwrap_or(defaults.age),
            bmi: self.bmi.unwrap_or(defaults.bmi),
            pregnancies: self.pregnancies.unwrap_or(defaults.pregnancies),
            bleeding_intensity: self
                .mean_bleeding_intensity
                .unwrap_or(defaults.bleeding_intensity),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_request_uses_defaults() {
        let request: CycleLengthRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request.profile(), CycleProfile::default());
    }

    #[test]
    fn test_malformed_fields_fall_back_to_defaults() {
        let request: CycleLengthRequest = serde_json::from_value(json!({
            "LengthofMenses": "six",
            "Age": "31",
            "BMI": null,
            "TotalDaysofFertility": [1, 2]
        }))
        .unwrap();
        let profile = request.profile();
        assert_eq!(profile.menses_length, DEFAULT_MENSES_LENGTH);
        assert_eq!(profile.age, 31.0);
        assert_eq!(profile.bmi, DEFAULT_BMI);
        assert_eq!(profile.fertile_days, DEFAULT_FERTILE_DAYS);
    }

    #[test]
    fn test_next_period_reads_flattened_cycle_fields() {
        let request: NextPeriodRequest = serde_json::from_value(json!({
            "Age": 34,
            "current_cycle_day": 30,
            "cycles_logged": 4
        }))
        .unwrap();
        let profile = request.profile();
        assert_eq!(profile.age, 34.0);
        assert_eq!(profile.cycle_day, 30.0);
        assert_eq!(profile.cycles_logged, 4.0);
        assert_eq!(profile.menses_length, DEFAULT_MENSES_LENGTH);
    }

    #[test]
    fn test_irregular_request_ovulation_detected_overrides_peak() {
        let request: IrregularCycleRequest = serde_json::from_value(json!({
            "recent_cycle_lengths": [45, 38, 52, 41],
            "cycle_with_peak": 1,
            "ovulation_detected": false,
            "unusual_bleeding": true,
            "bmi": 32
        }))
        .unwrap();
        let profile = request.profile();
        assert_eq!(profile.cycle_with_peak, 0.0);
        assert!(profile.unusual_bleeding);
        assert_eq!(profile.cycle_length, 45.0);
        assert_eq!(profile.cycles_logged, 4.0);
    }

    #[test]
    fn test_irregular_request_empty_history_is_absent() {
        let request: IrregularCycleRequest =
            serde_json::from_value(json!({ "recent_cycle_lengths": [] })).unwrap();
        let profile = request.profile();
        assert_eq!(profile.recent_cycle_lengths, vec![DEFAULT_CYCLE_LENGTH]);
        assert_eq!(profile.cycles_logged, 0.0);
    }

    #[test]
    fn test_symptom_request_reads_bleeding_intensity() {
        let request: SymptomRequest = serde_json::from_value(json!({
            "cycle_day": 2,
            "mean_bleeding_intensity": 7
        }))
        .unwrap();
        let profile = request.profile();
        assert_eq!(profile.cycle_day, 2.0);
        assert_eq!(profile.bleeding_intensity, 7.0);
        assert_eq!(profile.cycle_length, DEFAULT_CYCLE_LENGTH);
    }
}
