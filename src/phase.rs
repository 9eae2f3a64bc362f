// src/phase.rs
//! Cycle phase classification.
//!
//! Ovulation is placed at `cycle_length - 14` with a three-day window on either
//! side; the follicular, ovulation and luteal bands all derive from that
//! anchor. Bands are evaluated first-match-wins, so the result is defined even
//! when a short cycle makes the bands overlap or vanish.

use log::debug;
use serde::{Deserialize, Serialize};

/// Days before the next period at which ovulation is expected.
pub const OVULATION_OFFSET: f64 = 14.0;
/// Half-width of the ovulation window.
pub const OVULATION_WINDOW: f64 = 3.0;
/// Days before the next period that count as PMS.
pub const PMS_DAYS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
    Pms,
}

impl CyclePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CyclePhase::Menstrual => "menstrual",
            CyclePhase::Follicular => "follicular",
            CyclePhase::Ovulation => "ovulation",
            CyclePhase::Luteal => "luteal",
            CyclePhase::Pms => "pms",
        }
    }

    /// Phases with the most direct physiological signal.
    pub fn is_high_signal(&self) -> bool {
        matches!(self, CyclePhase::Menstrual | CyclePhase::Pms)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseClassification {
    pub phase: CyclePhase,
    pub message: String,
}

/// Upper bounds (inclusive) of each band for one cycle/menses length pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseBands {
    pub menses_length: f64,
    pub follicular_end: f64,
    pub ovulation_end: f64,
    pub luteal_end: f64,
}

impl PhaseBands {
    pub fn new(cycle_length: f64, menses_length: f64) -> Self {
        Self {
            menses_length,
            follicular_end: cycle_length - OVULATION_OFFSET - OVULATION_WINDOW,
            ovulation_end: cycle_length - OVULATION_OFFSET + OVULATION_WINDOW,
            luteal_end: cycle_length - PMS_DAYS,
        }
    }

    pub fn in_menstrual(&self, day: f64) -> bool {
        day <= self.menses_length
    }

    pub fn in_follicular(&self, day: f64) -> bool {
        self.menses_length < day && day <= self.follicular_end
    }

    pub fn in_ovulation(&self, day: f64) -> bool {
        self.follicular_end < day && day <= self.ovulation_end
    }

    pub fn in_luteal(&self, day: f64) -> bool {
        self.ovulation_end < day && day <= self.luteal_end
    }

    pub fn in_pms(&self, day: f64) -> bool {
        day > self.luteal_end
    }

    /// False when the menstrual band reaches into the ovulation window, i.e.
    /// the follicular band is empty and later bands are partly shadowed.
    pub fn is_well_formed(&self) -> bool {
        self.menses_length >= 0.0 && self.menses_length <= self.follicular_end
    }

    pub fn phase_for(&self, day: f64) -> CyclePhase {
        if self.in_menstrual(day) {
            CyclePhase::Menstrual
        } else if self.in_follicular(day) {
            CyclePhase::Follicular
        } else if self.in_ovulation(day) {
            CyclePhase::Ovulation
        } else if self.in_luteal(day) {
            CyclePhase::Luteal
        } else {
            CyclePhase::Pms
        }
    }
}

pub fn classify_phase(cycle_day: f64, cycle_length: f64, menses_length: f64) -> PhaseClassification {
    let bands = PhaseBands::new(cycle_length, menses_length);
    if !bands.is_well_formed() {
        debug!(
            "Phase bands overlap for cycle_length={} menses_length={}; using first-match order",
            cycle_length, menses_length
        );
    }
    let phase = bands.phase_for(cycle_day);
    let message = match phase {
        CyclePhase::Menstrual => format!("Day {} of your period", cycle_day),
        CyclePhase::Pms => format!(
            "{} days until period",
            (cycle_length - cycle_day + 1.0).max(1.0)
        ),
        CyclePhase::Ovulation => "Around ovulation time".to_string(),
        CyclePhase::Follicular => "Follicular phase".to_string(),
        CyclePhase::Luteal => "Luteal phase".to_string(),
    };
    PhaseClassification { phase, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_cycle_bands() {
        let expected = [
            (1.0, CyclePhase::Menstrual),
            (5.0, CyclePhase::Menstrual),
            (6.0, CyclePhase::Follicular),
            (11.0, CyclePhase::Follicular),
            (12.0, CyclePhase::Ovulation),
            (17.0, CyclePhase::Ovulation),
            (18.0, CyclePhase::Luteal),
            (23.0, CyclePhase::Luteal),
            (24.0, CyclePhase::Pms),
            (28.0, CyclePhase::Pms),
        ];
        for (day, phase) in expected {
            assert_eq!(classify_phase(day, 28.0, 5.0).phase, phase, "day {}", day);
        }
    }

    #[test]
    fn test_period_day_message() {
        let result = classify_phase(2.0, 28.0, 5.0);
        assert_eq!(result.phase, CyclePhase::Menstrual);
        assert_eq!(result.message, "Day 2 of your period");
    }

    #[test]
    fn test_pms_message_counts_down() {
        let result = classify_phase(26.0, 28.0, 5.0);
        assert_eq!(result.phase, CyclePhase::Pms);
        assert_eq!(result.message, "3 days until period");
    }

    #[test]
    fn test_pms_countdown_past_cycle_end_stays_at_one() {
        let result = classify_phase(30.0, 28.0, 5.0);
        assert_eq!(result.phase, CyclePhase::Pms);
        assert_eq!(result.message, "1 days until period");
    }

    #[test]
    fn test_exactly_one_phase_for_every_day() {
        for cycle_length in 10..=60 {
            for menses_length in 0..=10 {
                let bands = PhaseBands::new(cycle_length as f64, menses_length as f64);
                for day in 1..=cycle_length {
                    let day = day as f64;
                    let phase = bands.phase_for(day);
                    // The first band that matches is the one reported.
                    let first_match = [
                        (bands.in_menstrual(day), CyclePhase::Menstrual),
                        (bands.in_follicular(day), CyclePhase::Follicular),
                        (bands.in_ovulation(day), CyclePhase::Ovulation),
                        (bands.in_luteal(day), CyclePhase::Luteal),
                        (bands.in_pms(day), CyclePhase::Pms),
                    ]
                    .into_iter()
                    .find(|(matched, _)| *matched)
                    .map(|(_, phase)| phase);
                    assert_eq!(Some(phase), first_match);
                }
            }
        }
    }

    #[test]
    fn test_short_cycle_keeps_first_match_order() {
        // Menstrual band (<= 5) swallows the follicular band (<= 1) and part of ovulation (<= 7).
        let bands = PhaseBands::new(18.0, 5.0);
        assert!(!bands.is_well_formed());
        assert!(bands.in_menstrual(3.0) && bands.in_ovulation(3.0));
        assert_eq!(classify_phase(3.0, 18.0, 5.0).phase, CyclePhase::Menstrual);
        assert_eq!(classify_phase(6.0, 18.0, 5.0).phase, CyclePhase::Ovulation);
        assert_eq!(classify_phase(14.0, 18.0, 5.0).phase, CyclePhase::Pms);
    }

    #[test]
    fn test_well_formed_standard_cycle() {
        assert!(PhaseBands::new(28.0, 5.0).is_well_formed());
        assert!(PhaseBands::new(22.0, 5.0).is_well_formed());
        assert!(!PhaseBands::new(21.0, 5.0).is_well_formed());
    }

    #[test]
    fn test_high_signal_phases() {
        assert!(CyclePhase::Menstrual.is_high_signal());
        assert!(CyclePhase::Pms.is_high_signal());
        assert!(!CyclePhase::Ovulation.is_high_signal());
    }
}
