// src/features/menses_length.rs
use super::{FeatureMetadata, FeatureVector};
use crate::models::CycleProfile;

pub static SCHEMA: [FeatureMetadata; 5] = [
    FeatureMetadata {
        name: "Age",
        description: "Age in years.",
    },
    FeatureMetadata {
        name: "BMI",
        description: "Body mass index.",
    },
    FeatureMetadata {
        name: "LengthofCycle",
        description: "Typical cycle length in days.",
    },
    FeatureMetadata {
        name: "MeanBleedingIntensity",
        description: "Average bleeding intensity score.",
    },
    FeatureMetadata {
        name: "EstimatedDayofOvulation",
        description: "Estimated cycle day of ovulation.",
    },
];

pub fn derive(profile: &CycleProfile) -> FeatureVector {
    FeatureVector::new(
        &SCHEMA,
        [
            profile.age,
            profile.bmi,
            profile.cycle_length,
            profile.bleeding_intensity,
            profile.ovulation_day,
        ],
    )
}
