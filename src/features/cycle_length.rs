// src/features/cycle_length.rs
use super::{FeatureMetadata, FeatureVector};
use crate::models::CycleProfile;

pub static SCHEMA: [FeatureMetadata; 6] = [
    FeatureMetadata {
        name: "LengthofMenses",
        description: "Days of active bleeding.",
    },
    FeatureMetadata {
        name: "Age",
        description: "Age in years.",
    },
    FeatureMetadata {
        name: "BMI",
        description: "Body mass index.",
    },
    FeatureMetadata {
        name: "EstimatedDayofOvulation",
        description: "Estimated cycle day of ovulation.",
    },
    FeatureMetadata {
        name: "LengthofLutealPhase",
        description: "Days from ovulation to the next period.",
    },
    FeatureMetadata {
        name: "TotalDaysofFertility",
        description: "Length of the fertile window in days.",
    },
];

pub fn derive(profile: &CycleProfile) -> FeatureVector {
    FeatureVector::new(
        &SCHEMA,
        [
            profile.menses_length,
            profile.age,
            profile.bmi,
            profile.ovulation_day,
            profile.luteal_phase_length,
            profile.fertile_days,
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vector() {
        let vector = derive(&CycleProfile::default());
        assert_eq!(vector.values(), &[5.0, 25.0, 25.0, 14.0, 14.0, 6.0]);
    }
}
