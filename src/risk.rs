// src/risk.rs
//! Composite risk scores, levels and advisory text for irregular cycles.

use crate::features::IrregularityIndicators;
use crate::models::RiskLevel;
use crate::utils::flag;

/// Cycle-length standard deviation above which variability is flagged.
pub const HIGH_VARIABILITY_DAYS: f64 = 7.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RiskScore {
    pub pcos_risk_score: u8,
    pub pcos_risk_level: RiskLevel,
    pub hormonal_imbalance_score: f64,
    pub hormonal_imbalance_level: RiskLevel,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Advisories {
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Advisories {
    fn push(&mut self, warning: &str, recommendation: &str) {
        self.warnings.push(warning.to_string());
        self.recommendations.push(recommendation.to_string());
    }
}

/// Count of triggered PCOS indicators, always in 0..=4.
pub fn pcos_risk_score(indicators: &IrregularityIndicators) -> u8 {
    [
        indicators.cycle_too_long,
        indicators.no_ovulation,
        indicators.obese_bmi,
        indicators.unusual_bleeding,
    ]
    .iter()
    .filter(|triggered| **triggered)
    .count() as u8
}

/// `variability / 5` plus one point per hormonal indicator. Never negative.
pub fn hormonal_imbalance_score(indicators: &IrregularityIndicators) -> f64 {
    indicators.cycle_variability / 5.0
        + flag(indicators.luteal_too_short)
        + flag(indicators.very_heavy_bleeding)
        + flag(indicators.very_light_bleeding)
}

pub fn probability_risk_level(probability: f64) -> RiskLevel {
    if probability >= 0.7 {
        RiskLevel::High
    } else if probability >= 0.4 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn pcos_risk_level(score: u8) -> RiskLevel {
    if score >= 3 {
        RiskLevel::High
    } else if score >= 2 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn hormonal_imbalance_level(score: f64) -> RiskLevel {
    if score >= 2.0 {
        RiskLevel::High
    } else if score >= 1.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn score(indicators: &IrregularityIndicators) -> RiskScore {
    let pcos = pcos_risk_score(indicators);
    let hormonal = hormonal_imbalance_score(indicators);
    RiskScore {
        pcos_risk_score: pcos,
        pcos_risk_level: pcos_risk_level(pcos),
        hormonal_imbalance_score: hormonal,
        hormonal_imbalance_level: hormonal_imbalance_level(hormonal),
    }
}

/// Rules are independent; output order is the rule order below.
pub fn advisories(indicators: &IrregularityIndicators) -> Advisories {
    let mut out = Advisories::default();
    if indicators.cycle_too_long {
        out.push("Long cycles detected", "Monitor for PCOS symptoms");
    }
    if indicators.cycle_variability > HIGH_VARIABILITY_DAYS {
        out.push("High cycle variability", "Track stress and lifestyle factors");
    }
    if indicators.unusual_bleeding {
        out.push("Unusual bleeding patterns", "Discuss with healthcare provider");
    }
    if indicators.no_ovulation {
        out.push(
            "Ovulation not consistently detected",
            "Track cervical mucus changes",
        );
    }
    if indicators.luteal_too_short {
        out.push("Short luteal phase", "Consider progesterone testing");
    }
    if indicators.cycle_too_short {
        out.push(
            "Very short cycles detected",
            "Consider tracking basal body temperature",
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CycleProfile;

    fn indicators(profile: CycleProfile) -> IrregularityIndicators {
        IrregularityIndicators::from_profile(&profile)
    }

    #[test]
    fn test_pcos_scenario_scores_four() {
        let result = score(&indicators(CycleProfile {
            recent_cycle_lengths: vec![45.0, 38.0, 52.0, 41.0],
            cycle_length: 45.0,
            cycle_with_peak: 0.0,
            bmi: 32.0,
            unusual_bleeding: true,
            ..CycleProfile::default()
        }));
        assert_eq!(result.pcos_risk_score, 4);
        assert_eq!(result.pcos_risk_level, RiskLevel::High);
    }

    #[test]
    fn test_regular_profile_is_low_risk() {
        let regular = indicators(CycleProfile {
            recent_cycle_lengths: vec![28.0, 29.0, 27.0, 28.0],
            bmi: 22.0,
            ..CycleProfile::default()
        });
        let result = score(&regular);
        assert_eq!(result.pcos_risk_score, 0);
        assert_eq!(result.pcos_risk_level, RiskLevel::Low);
        assert!(result.hormonal_imbalance_score >= 0.0);
        assert_eq!(result.hormonal_imbalance_level, RiskLevel::Low);
        assert_eq!(advisories(&regular), Advisories::default());
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(probability_risk_level(0.7), RiskLevel::High);
        assert_eq!(probability_risk_level(0.69), RiskLevel::Medium);
        assert_eq!(probability_risk_level(0.4), RiskLevel::Medium);
        assert_eq!(probability_risk_level(0.39), RiskLevel::Low);
        assert_eq!(pcos_risk_level(3), RiskLevel::High);
        assert_eq!(pcos_risk_level(2), RiskLevel::Medium);
        assert_eq!(pcos_risk_level(1), RiskLevel::Low);
        assert_eq!(hormonal_imbalance_level(2.0), RiskLevel::High);
        assert_eq!(hormonal_imbalance_level(1.0), RiskLevel::Medium);
        assert_eq!(hormonal_imbalance_level(0.99), RiskLevel::Low);
    }

    #[test]
    fn test_all_rules_fire_in_order() {
        let all = indicators(CycleProfile {
            recent_cycle_lengths: vec![45.0, 20.0, 60.0],
            cycle_length: 45.0,
            cycle_with_peak: 0.0,
            luteal_phase_length: 8.0,
            unusual_bleeding: true,
            ..CycleProfile::default()
        });
        let out = advisories(&all);
        assert_eq!(
            out.warnings,
            vec![
                "Long cycles detected",
                "High cycle variability",
                "Unusual bleeding patterns",
                "Ovulation not consistently detected",
                "Short luteal phase",
            ]
        );
        assert_eq!(
            out.recommendations,
            vec![
                "Monitor for PCOS symptoms",
                "Track stress and lifestyle factors",
                "Discuss with healthcare provider",
                "Track cervical mucus changes",
                "Consider progesterone testing",
            ]
        );
    }

    #[test]
    fn test_short_cycle_advice() {
        let short = indicators(CycleProfile {
            recent_cycle_lengths: vec![19.0],
            cycle_length: 19.0,
            ..CycleProfile::default()
        });
        let out = advisories(&short);
        assert_eq!(out.warnings, vec!["Very short cycles detected"]);
        assert_eq!(out.recommendations, vec!["Consider tracking basal body temperature"]);
    }

    #[test]
    fn test_scores_stay_in_range() {
        for bmi in [15.0, 25.0, 31.0] {
            for peak in [0.0, 1.0] {
                for lengths in [vec![20.0], vec![40.0, 22.0, 50.0], vec![28.0, 28.0]] {
                    let result = score(&indicators(CycleProfile {
                        cycle_length: lengths[0],
                        recent_cycle_lengths: lengths,
                        cycle_with_peak: peak,
                        bmi,
                        unusual_bleeding: peak == 0.0,
                        ..CycleProfile::default()
                    }));
                    assert!(result.pcos_risk_score <= 4);
                    assert!(result.hormonal_imbalance_score >= 0.0);
                }
            }
        }
    }
}
