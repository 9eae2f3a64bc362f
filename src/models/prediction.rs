// src/models/prediction.rs
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::phase::CyclePhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// How a response was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The predictor answered.
    Served,
    /// The required predictor was never loaded; the body holds fallback values.
    NotLoaded,
    /// Derivation or inference failed; the body holds fallback values.
    Degraded,
}

impl Outcome {
    pub fn status_code(&self) -> u16 {
        match self {
            Outcome::Served => 200,
            Outcome::NotLoaded | Outcome::Degraded => 500,
        }
    }
}

/// A use-case payload tagged with how it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction<T> {
    pub outcome: Outcome,
    pub payload: T,
    pub error: Option<String>,
}

impl<T> Prediction<T> {
    pub fn served(payload: T) -> Self {
        Self {
            outcome: Outcome::Served,
            payload,
            error: None,
        }
    }

    pub fn not_loaded(payload: T, error: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::NotLoaded,
            payload,
            error: Some(error.into()),
        }
    }

    pub fn degraded(payload: T, error: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Degraded,
            payload,
            error: Some(error.into()),
        }
    }

    pub fn is_served(&self) -> bool {
        self.outcome == Outcome::Served
    }
}

impl<T: Serialize> Prediction<T> {
    pub fn into_response(self) -> ServiceResponse {
        let mut body = match serde_json::to_value(&self.payload) {
            Ok(body) => body,
            Err(e) => return ServiceResponse::error(500, format!("Failed to encode response: {}", e)),
        };
        if let (Some(error), Some(map)) = (self.error, body.as_object_mut()) {
            map.insert("error".to_string(), JsonValue::String(error));
        }
        ServiceResponse {
            status: self.outcome.status_code(),
            outcome: Some(self.outcome),
            body,
        }
    }
}

/// Transport-neutral response: a status code and a JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceResponse {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    pub body: JsonValue,
}

impl ServiceResponse {
    pub fn ok(body: JsonValue) -> Self {
        Self {
            status: 200,
            outcome: None,
            body,
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            outcome: None,
            body: json!({ "error": message.into() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleLengthPrediction {
    pub predicted_cycle_length: f64,
    pub confidence: Confidence,
    pub model_accuracy: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MensesLengthPrediction {
    pub predicted_menses_length: f64,
    pub confidence: Confidence,
    pub model_accuracy: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextPeriodPrediction {
    pub days_until_next_period: i64,
    pub predicted_cycle_length: f64,
    pub confidence: Confidence,
    pub model_accuracy: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrregularityAssessment {
    pub is_irregular: bool,
    pub irregular_probability: f64,
    pub risk_level: RiskLevel,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub pcos_risk_score: u8,
    pub pcos_risk_level: RiskLevel,
    pub hormonal_imbalance_score: f64,
    pub hormonal_imbalance_level: RiskLevel,
    pub cycle_variability: f64,
    pub confidence: Confidence,
    pub model_accuracy: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomDescriptions {
    pub cramps: String,
    pub flow: String,
    pub fatigue: String,
    pub mood: String,
    pub overall: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopSymptom {
    pub name: String,
    pub intensity: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomForecast {
    pub cramp_intensity: f64,
    pub flow_intensity: f64,
    pub fatigue_level: f64,
    pub mood_impact: f64,
    pub overall_discomfort: f64,
    pub descriptions: SymptomDescriptions,
    pub top_symptoms: Vec<TopSymptom>,
    pub phase: CyclePhase,
    pub phase_message: String,
    pub confidence: Confidence,
    pub model_accuracy: String,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CycleLengthPrediction {
        CycleLengthPrediction {
            predicted_cycle_length: 28.0,
            confidence: Confidence::Low,
            model_accuracy: "fallback".to_string(),
            explanation: "default".to_string(),
        }
    }

    #[test]
    fn test_served_response_has_no_error_field() {
        let response = Prediction::served(sample()).into_response();
        assert_eq!(response.status, 200);
        assert_eq!(response.outcome, Some(Outcome::Served));
        assert!(response.body.get("error").is_none());
        assert_eq!(response.body["confidence"], "low");
    }

    #[test]
    fn test_degraded_response_keeps_payload_and_adds_error() {
        let response = Prediction::degraded(sample(), "prediction failed").into_response();
        assert_eq!(response.status, 500);
        assert_eq!(response.outcome, Some(Outcome::Degraded));
        assert_eq!(response.body["predicted_cycle_length"], 28.0);
        assert_eq!(response.body["error"], "prediction failed");
    }

    #[test]
    fn test_outcome_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(Outcome::NotLoaded).unwrap(),
            serde_json::json!("not_loaded")
        );
    }
}
