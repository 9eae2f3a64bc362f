// src/features/next_period.rs
//! Columns the backup next-period regressor was trained on. No operation
//! derives this vector; the schema only validates the slot's model file.

use super::FeatureMetadata;

pub static SCHEMA: [FeatureMetadata; 15] = [
    FeatureMetadata {
        name: "MeanCycleLength",
        description: "Mean logged cycle length in days.",
    },
    FeatureMetadata {
        name: "CycleVariability",
        description: "Absolute gap between current and mean cycle length.",
    },
    FeatureMetadata {
        name: "EstimatedDayofOvulation",
        description: "Estimated cycle day of ovulation.",
    },
    FeatureMetadata {
        name: "LutealPhaseLength",
        description: "Luteal phase length in days.",
    },
    FeatureMetadata {
        name: "MensesLength",
        description: "Period length in days.",
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
        name: "NumberPregnancies",
        description: "Number of pregnancies.",
    },
    FeatureMetadata {
        name: "CycleWithPeak",
        description: "1 if an LH peak was observed in the cycle.",
    },
    FeatureMetadata {
        name: "UnusualBleeding",
        description: "1 if unusual bleeding was reported.",
    },
    FeatureMetadata {
        name: "OvulationTiming",
        description: "Ovulation day over cycle length.",
    },
    FeatureMetadata {
        name: "LutealRatio",
        description: "Luteal length over cycle length.",
    },
    FeatureMetadata {
        name: "MensesRatio",
        description: "Period length over cycle length.",
    },
    FeatureMetadata {
        name: "AgeAdjustedCycle",
        description: "Cycle length scaled by age / 28.",
    },
    FeatureMetadata {
        name: "FertilityRatio",
        description: "Six fertile days over cycle length.",
    },
];
