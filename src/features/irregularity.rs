// src/features/irregularity.rs
//! Irregular-cycle indicators and the 28-feature detector vector.
//!
//! Threshold constants are the medical cut-offs the detector was trained with.

use super::{FeatureMetadata, FeatureVector};
use crate::models::CycleProfile;
use crate::risk;
use crate::utils::flag;

pub const SHORT_CYCLE_DAYS: f64 = 21.0;
pub const LONG_CYCLE_DAYS: f64 = 35.0;
pub const SHORT_LUTEAL_DAYS: f64 = 10.0;
pub const LONG_LUTEAL_DAYS: f64 = 16.0;
pub const SHORT_MENSES_DAYS: f64 = 3.0;
pub const LONG_MENSES_DAYS: f64 = 7.0;
pub const HEAVY_BLEEDING_INTENSITY: f64 = 10.0;
pub const LIGHT_BLEEDING_INTENSITY: f64 = 3.0;
pub const UNDERWEIGHT_BMI: f64 = 18.5;
pub const OVERWEIGHT_BMI: f64 = 25.0;
pub const OBESE_BMI: f64 = 30.0;
pub const NULLIPAROUS_ADULT_AGE: f64 = 30.0;
pub const TEENAGE_AGE: f64 = 20.0;
pub const PERIMENOPAUSE_AGE: f64 = 40.0;

pub static SCHEMA: [FeatureMetadata; 28] = [
    FeatureMetadata { name: "CycleLength", description: "Most recent cycle length." },
    FeatureMetadata { name: "MeanCycleLength", description: "Mean of recent cycle lengths." },
    FeatureMetadata { name: "CycleVariability", description: "Population std-dev of recent cycle lengths." },
    FeatureMetadata { name: "CycleTooShort", description: "1 when the cycle is under 21 days." },
    FeatureMetadata { name: "CycleTooLong", description: "1 when the cycle is over 35 days." },
    FeatureMetadata { name: "CycleWithPeak", description: "1 when an ovulation peak was observed." },
    FeatureMetadata { name: "NoOvulationDetected", description: "1 when no ovulation peak was observed." },
    FeatureMetadata { name: "LutealPhaseLength", description: "Luteal phase length in days." },
    FeatureMetadata { name: "LutealPhaseTooShort", description: "1 when the luteal phase is under 10 days." },
    FeatureMetadata { name: "LutealPhaseTooLong", description: "1 when the luteal phase is over 16 days." },
    FeatureMetadata { name: "MensesLength", description: "Days of active bleeding." },
    FeatureMetadata { name: "MensesTooShort", description: "1 when bleeding lasts under 3 days." },
    FeatureMetadata { name: "MensesTooLong", description: "1 when bleeding lasts over 7 days." },
    FeatureMetadata { name: "UnusualBleeding", description: "1 when unusual bleeding was reported." },
    FeatureMetadata { name: "BleedingIntensity", description: "Average bleeding intensity score." },
    FeatureMetadata { name: "VeryHeavyBleeding", description: "1 when intensity is over 10." },
    FeatureMetadata { name: "VeryLightBleeding", description: "1 when intensity is under 3." },
    FeatureMetadata { name: "Age", description: "Age in years." },
    FeatureMetadata { name: "BMI", description: "Body mass index." },
    FeatureMetadata { name: "UnderweightBMI", description: "1 when BMI is under 18.5." },
    FeatureMetadata { name: "OverweightBMI", description: "1 when BMI is over 25." },
    FeatureMetadata { name: "ObeseBMI", description: "1 when BMI is over 30." },
    FeatureMetadata { name: "NumberPregnancies", description: "Number of previous pregnancies." },
    FeatureMetadata { name: "NullipariousAdult", description: "1 when over 30 with no pregnancies." },
    FeatureMetadata { name: "TeenageYears", description: "1 when under 20." },
    FeatureMetadata { name: "Perimenopause", description: "1 when over 40." },
    FeatureMetadata { name: "PCOSRiskScore", description: "Count of PCOS indicators (0-4)." },
    FeatureMetadata { name: "HormonalImbalanceScore", description: "Variability-weighted imbalance score." },
];

/// Population standard deviation; 0 for fewer than two cycles.
pub fn cycle_variability(lengths: &[f64]) -> f64 {
    if lengths.len() < 2 {
        return 0.0;
    }
    let n = lengths.len() as f64;
    let mean = lengths.iter().sum::<f64>() / n;
    let variance = lengths.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Every sub-indicator the detector and the risk scores are built from.
#[derive(Debug, Clone, PartialEq)]
pub struct IrregularityIndicators {
    pub cycle_length: f64,
    pub mean_cycle_length: f64,
    pub cycle_variability: f64,
    pub cycle_too_short: bool,
    pub cycle_too_long: bool,
    pub cycle_with_peak: f64,
    pub no_ovulation: bool,
    pub luteal_phase_length: f64,
    pub luteal_too_short: bool,
    pub luteal_too_long: bool,
    pub menses_length: f64,
    pub menses_too_short: bool,
    pub menses_too_long: bool,
    pub unusual_bleeding: bool,
    pub bleeding_intensity: f64,
    pub very_heavy_bleeding: bool,
    pub very_light_bleeding: bool,
    pub age: f64,
    pub bmi: f64,
    pub underweight_bmi: bool,
    pub overweight_bmi: bool,
    pub obese_bmi: bool,
    pub pregnancies: f64,
    pub nulliparous_adult: bool,
    pub teenage_years: bool,
    pub perimenopause: bool,
    /// Number of cycles the history is based on
    pub cycles_observed: usize,
}

impl IrregularityIndicators {
    pub fn from_profile(profile: &CycleProfile) -> Self {
        let lengths = &profile.recent_cycle_lengths;
        let cycle_length = profile.cycle_length;
        let mean_cycle_length = if lengths.is_empty() {
            cycle_length
        } else {
            lengths.iter().sum::<f64>() / lengths.len() as f64
        };
        let luteal = profile.luteal_phase_length;
        let menses = profile.menses_length;
        let intensity = profile.bleeding_intensity;
        let age = profile.age;
        let bmi = profile.bmi;

        Self {
            cycle_length,
            mean_cycle_length,
            cycle_variability: cycle_variability(lengths),
            cycle_too_short: cycle_length < SHORT_CYCLE_DAYS,
            cycle_too_long: cycle_length > LONG_CYCLE_DAYS,
            cycle_with_peak: profile.cycle_with_peak,
            no_ovulation: profile.cycle_with_peak == 0.0,
            luteal_phase_length: luteal,
            luteal_too_short: luteal < SHORT_LUTEAL_DAYS,
            luteal_too_long: luteal > LONG_LUTEAL_DAYS,
            menses_length: menses,
            menses_too_short: menses < SHORT_MENSES_DAYS,
            menses_too_long: menses > LONG_MENSES_DAYS,
            unusual_bleeding: profile.unusual_bleeding,
            bleeding_intensity: intensity,
            very_heavy_bleeding: intensity > HEAVY_BLEEDING_INTENSITY,
            very_light_bleeding: intensity < LIGHT_BLEEDING_INTENSITY,
            age,
            bmi,
            underweight_bmi: bmi < UNDERWEIGHT_BMI,
            overweight_bmi: bmi > OVERWEIGHT_BMI,
            obese_bmi: bmi > OBESE_BMI,
            pregnancies: profile.pregnancies,
            nulliparous_adult: age > NULLIPAROUS_ADULT_AGE && profile.pregnancies == 0.0,
            teenage_years: age < TEENAGE_AGE,
            perimenopause: age > PERIMENOPAUSE_AGE,
            cycles_observed: lengths.len(),
        }
    }

    pub fn to_vector(&self) -> FeatureVector {
        FeatureVector::new(
            &SCHEMA,
            [
                self.cycle_length,
                self.mean_cycle_length,
                self.cycle_variability,
                flag(self.cycle_too_short),
                flag(self.cycle_too_long),
                self.cycle_with_peak,
                flag(self.no_ovulation),
                self.luteal_phase_length,
                flag(self.luteal_too_short),
                flag(self.luteal_too_long),
                self.menses_length,
                flag(self.menses_too_short),
                flag(self.menses_too_long),
                flag(self.unusual_bleeding),
                self.bleeding_intensity,
                flag(self.very_heavy_bleeding),
                flag(self.very_light_bleeding),
                self.age,
                self.bmi,
                flag(self.underweight_bmi),
                flag(self.overweight_bmi),
                flag(self.obese_bmi),
                self.pregnancies,
                flag(self.nulliparous_adult),
                flag(self.teenage_years),
                flag(self.perimenopause),
                f64::from(risk::pcos_risk_score(self)),
                risk::hormonal_imbalance_score(self),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcos_profile() -> CycleProfile {
        CycleProfile {
            recent_cycle_lengths: vec![45.0, 38.0, 52.0, 41.0],
            cycle_length: 45.0,
            cycle_with_peak: 0.0,
            luteal_phase_length: 8.0,
            menses_length: 3.0,
            unusual_bleeding: true,
            bleeding_intensity: 2.0,
            age: 27.0,
            bmi: 32.0,
            ..CycleProfile::default()
        }
    }

    #[test]
    fn test_population_std_dev() {
        assert_eq!(cycle_variability(&[28.0]), 0.0);
        assert_eq!(cycle_variability(&[]), 0.0);
        assert_eq!(cycle_variability(&[26.0, 30.0]), 2.0);
        let variability = cycle_variability(&[45.0, 38.0, 52.0, 41.0]);
        assert!((variability - 5.244044240850758).abs() < 1e-12);
    }

    #[test]
    fn test_pcos_profile_indicators() {
        let indicators = IrregularityIndicators::from_profile(&pcos_profile());
        assert!(indicators.cycle_too_long);
        assert!(!indicators.cycle_too_short);
        assert!(indicators.no_ovulation);
        assert!(indicators.obese_bmi);
        assert!(indicators.overweight_bmi);
        assert!(indicators.luteal_too_short);
        assert!(indicators.very_light_bleeding);
        assert!(!indicators.menses_too_short);
        assert_eq!(indicators.mean_cycle_length, 44.0);
        assert_eq!(indicators.cycles_observed, 4);
    }

    #[test]
    fn test_pcos_profile_vector() {
        let vector = IrregularityIndicators::from_profile(&pcos_profile()).to_vector();
        assert_eq!(vector.len(), 28);
        assert_eq!(vector.get("CycleLength"), Some(45.0));
        assert_eq!(vector.get("NoOvulationDetected"), Some(1.0));
        assert_eq!(vector.get("CycleWithPeak"), Some(0.0));
        assert_eq!(vector.get("PCOSRiskScore"), Some(4.0));
        let hormonal = vector.get("HormonalImbalanceScore").unwrap();
        assert!((hormonal - (5.244044240850758 / 5.0 + 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_boundaries_are_strict() {
        let profile = CycleProfile {
            recent_cycle_lengths: vec![35.0],
            cycle_length: 35.0,
            luteal_phase_length: 10.0,
            menses_length: 7.0,
            bleeding_intensity: 10.0,
            bmi: 30.0,
            age: 30.0,
            ..CycleProfile::default()
        };
        let indicators = IrregularityIndicators::from_profile(&profile);
        assert!(!indicators.cycle_too_long);
        assert!(!indicators.luteal_too_short);
        assert!(!indicators.menses_too_long);
        assert!(!indicators.very_heavy_bleeding);
        assert!(!indicators.obese_bmi);
        assert!(indicators.overweight_bmi);
        assert!(!indicators.nulliparous_adult);
    }

    #[test]
    fn test_nulliparous_and_age_flags() {
        let profile = CycleProfile {
            age: 42.0,
            pregnancies: 0.0,
            ..CycleProfile::default()
        };
        let indicators = IrregularityIndicators::from_profile(&profile);
        assert!(indicators.nulliparous_adult);
        assert!(indicators.perimenopause);
        assert!(!indicators.teenage_years);
    }
}
