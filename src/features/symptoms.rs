// src/features/symptoms.rs
use super::{FeatureMetadata, FeatureVector};
use crate::models::CycleProfile;
use crate::phase::{PhaseBands, OVULATION_OFFSET};
use crate::utils::flag;

pub static SCHEMA: [FeatureMetadata; 21] = [
    FeatureMetadata {
        name: "cycle_day",
        description: "1-based day within the current cycle.",
    },
    FeatureMetadata {
        name: "cycle_length",
        description: "Typical cycle length in days.",
    },
    FeatureMetadata {
        name: "menses_length",
        description: "Days of active bleeding.",
    },
    FeatureMetadata {
        name: "days_since_period_start",
        description: "Days elapsed since the first day of the period.",
    },
    FeatureMetadata {
        name: "days_until_next_period",
        description: "Days remaining in the cycle.",
    },
    FeatureMetadata {
        name: "is_period_phase",
        description: "1 while bleeding is expected.",
    },
    FeatureMetadata {
        name: "is_follicular_phase",
        description: "1 between the period and the ovulation window.",
    },
    FeatureMetadata {
        name: "is_ovulation_phase",
        description: "1 within three days of expected ovulation.",
    },
    FeatureMetadata {
        name: "is_luteal_phase",
        description: "1 after the ovulation window and before PMS.",
    },
    FeatureMetadata {
        name: "is_pms_phase",
        description: "1 in the last five days of the cycle.",
    },
    FeatureMetadata {
        name: "period_day",
        description: "Day of the period, 0 outside the period.",
    },
    FeatureMetadata {
        name: "period_day_normalized",
        description: "period_day divided by menses_length.",
    },
    FeatureMetadata {
        name: "age",
        description: "Age in years.",
    },
    FeatureMetadata {
        name: "bmi",
        description: "Body mass index.",
    },
    FeatureMetadata {
        name: "pregnancies",
        description: "Number of previous pregnancies.",
    },
    FeatureMetadata {
        name: "mean_bleeding_intensity",
        description: "Average bleeding intensity score.",
    },
    FeatureMetadata {
        name: "cycle_day_ratio",
        description: "Position within the cycle, cycle_day / cycle_length.",
    },
    FeatureMetadata {
        name: "ovulation_proximity",
        description: "Normalised distance from expected ovulation.",
    },
    FeatureMetadata {
        name: "is_teenager",
        description: "1 when age < 20.",
    },
    FeatureMetadata {
        name: "is_adult",
        description: "1 when 20 <= age <= 35.",
    },
    FeatureMetadata {
        name: "is_older_adult",
        description: "1 when age > 35.",
    },
];

pub fn period_day(cycle_day: f64, menses_length: f64) -> f64 {
    if cycle_day <= menses_length {
        cycle_day.min(menses_length)
    } else {
        0.0
    }
}

pub fn period_day_normalized(cycle_day: f64, menses_length: f64) -> f64 {
    if cycle_day <= menses_length && menses_length > 0.0 {
        period_day(cycle_day, menses_length) / menses_length
    } else {
        0.0
    }
}

pub fn cycle_day_ratio(cycle_day: f64, cycle_length: f64) -> f64 {
    cycle_day / cycle_length
}

pub fn ovulation_proximity(cycle_day: f64, cycle_length: f64) -> f64 {
    (cycle_day - (cycle_length - OVULATION_OFFSET)).abs() / cycle_length
}

pub fn derive(profile: &CycleProfile) -> FeatureVector {
    let day = profile.cycle_day;
    let length = profile.cycle_length;
    let menses = profile.menses_length;
    let age = profile.age;
    // Each flag is tested on its own, exactly as in training; overlap is
    // resolved only when the phase is reported.
    let bands = PhaseBands::new(length, menses);

    FeatureVector::new(
        &SCHEMA,
        [
            day,
            length,
            menses,
            (day - 1.0).max(0.0),
            (length - day).max(0.0),
            flag(bands.in_menstrual(day)),
            flag(bands.in_follicular(day)),
            flag(bands.in_ovulation(day)),
            flag(bands.in_luteal(day)),
            flag(bands.in_pms(day)),
            period_day(day, menses),
            period_day_normalized(day, menses),
            age,
            profile.bmi,
            profile.pregnancies,
            profile.bleeding_intensity,
            cycle_day_ratio(day, length),
            ovulation_proximity(day, length),
            flag(age < 20.0),
            flag((20.0..=35.0).contains(&age)),
            flag(age > 35.0),
        ],
    )
}
