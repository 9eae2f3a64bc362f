pub mod prediction;
pub mod profile;

pub use prediction::{
    Confidence, CycleLengthPrediction, IrregularityAssessment, MensesLengthPrediction,
    NextPeriodPrediction, Outcome, Prediction, RiskLevel, ServiceResponse, SymptomDescriptions,
    SymptomForecast, TopSymptom,
};
pub use profile::{
    CycleLengthRequest, CycleProfile, IrregularCycleRequest, MensesLengthRequest,
    NextPeriodRequest, SymptomRequest,
};
