// src/service.rs
//! Transport-neutral operation surface.
//!
//! Each operation takes the raw JSON request, resolves it into a typed request
//! with defaults, and returns a [`Prediction`]; [`LunaService::dispatch`] maps
//! operation names (or the historical route paths) onto them and renders a
//! [`ServiceResponse`].

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::aggregator;
use crate::degradation::{self, serve};
use crate::models::{
    CycleLengthPrediction, CycleLengthRequest, IrregularCycleRequest, IrregularityAssessment,
    MensesLengthPrediction, MensesLengthRequest, NextPeriodPrediction, NextPeriodRequest,
    Prediction, ServiceResponse, SymptomForecast, SymptomRequest,
};
use crate::predictors::{PredictorRegistry, PredictorSlot};

pub const SERVICE_NAME: &str = "Luna ML API";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    PredictCycleLength,
    PredictMensesLength,
    PredictNextPeriod,
    DetectIrregularCycle,
    PredictSymptoms,
    HealthCheck,
    ServiceInfo,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::PredictCycleLength,
        Operation::PredictMensesLength,
        Operation::PredictNextPeriod,
        Operation::DetectIrregularCycle,
        Operation::PredictSymptoms,
        Operation::HealthCheck,
        Operation::ServiceInfo,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::PredictCycleLength => "predict_cycle_length",
            Operation::PredictMensesLength => "predict_menses_length",
            Operation::PredictNextPeriod => "predict_next_period",
            Operation::DetectIrregularCycle => "detect_irregular_cycle",
            Operation::PredictSymptoms => "predict_symptoms",
            Operation::HealthCheck => "health_check",
            Operation::ServiceInfo => "service_info",
        }
    }

    pub fn route(&self) -> &'static str {
        match self {
            Operation::PredictCycleLength => "/predict/cycle-length",
            Operation::PredictMensesLength => "/predict/menses-length",
            Operation::PredictNextPeriod => "/predict/next-period",
            Operation::DetectIrregularCycle => "/detect/irregular-cycle",
            Operation::PredictSymptoms => "/predict/symptoms",
            Operation::HealthCheck => "/health",
            Operation::ServiceInfo => "/",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s || op.route() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown operation: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub models_loaded: usize,
    pub models: BTreeMap<String, String>,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub models_loaded: usize,
    pub operations: Vec<String>,
    pub endpoints: Vec<String>,
}

/// Cheap to clone; every clone shares the same registry.
#[derive(Debug, Clone)]
pub struct LunaService {
    registry: Arc<PredictorRegistry>,
}

/// Reads a typed request. A body that is not a JSON object is treated as empty.
fn parse_request<R: DeserializeOwned + Default>(operation: &str, payload: &JsonValue) -> R {
    match payload {
        JsonValue::Null => R::default(),
        JsonValue::Object(_) => serde_json::from_value(payload.clone()).unwrap_or_else(|e| {
            warn!("{}: unreadable request ({}); using defaults", operation, e);
            R::default()
        }),
        other => {
            warn!(
                "{}: expected a JSON object, got {}; using defaults",
                operation, other
            );
            R::default()
        }
    }
}

impl LunaService {
    pub fn new(registry: PredictorRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn predict_cycle_length(&self, payload: &JsonValue) -> Prediction<CycleLengthPrediction> {
        let op = Operation::PredictCycleLength.name();
        let profile = parse_request::<CycleLengthRequest>(op, payload).profile();
        serve(
            op,
            || aggregator::cycle_length::predict(&self.registry, &profile),
            degradation::cycle_length_fallback,
        )
    }

    pub fn predict_menses_length(&self, payload: &JsonValue) -> Prediction<MensesLengthPrediction> {
        let op = Operation::PredictMensesLength.name();
        let profile = parse_request::<MensesLengthRequest>(op, payload).profile();
        serve(
            op,
            || aggregator::menses_length::predict(&self.registry, &profile),
            degradation::menses_length_fallback,
        )
    }

    pub fn predict_next_period(&self, payload: &JsonValue) -> Prediction<NextPeriodPrediction> {
        let op = Operation::PredictNextPeriod.name();
        let profile = parse_request::<NextPeriodRequest>(op, payload).profile();
        serve(
            op,
            || aggregator::next_period::predict(&self.registry, &profile),
            degradation::next_period_fallback,
        )
    }

    pub fn detect_irregular_cycle(&self, payload: &JsonValue) -> Prediction<IrregularityAssessment> {
        let op = Operation::DetectIrregularCycle.name();
        let profile = parse_request::<IrregularCycleRequest>(op, payload).profile();
        serve(
            op,
            || aggregator::irregularity::assess(&self.registry, &profile),
            degradation::irregularity_fallback,
        )
    }

    pub fn predict_symptoms(&self, payload: &JsonValue) -> Prediction<SymptomForecast> {
        let op = Operation::PredictSymptoms.name();
        let profile = parse_request::<SymptomRequest>(op, payload).profile();
        serve(
            op,
            || aggregator::symptoms::predict(&self.registry, &profile),
            || degradation::symptoms_fallback(&profile),
        )
    }

    pub fn health_check(&self) -> HealthReport {
        let models = self
            .registry
            .availability()
            .into_iter()
            .map(|(slot, loaded)| {
                let label = if loaded {
                    slot.accuracy_label()
                } else {
                    "Not loaded"
                };
                (slot.health_key().to_string(), label.to_string())
            })
            .collect();
        let models_loaded = self.registry.loaded_count();
        let status = if models_loaded == PredictorSlot::ALL.len() {
            "healthy"
        } else {
            "degraded"
        };
        HealthReport {
            status: status.to_string(),
            models_loaded,
            models,
            checked_at: Utc::now(),
        }
    }

    pub fn service_info(&self) -> ServiceInfo {
        ServiceInfo {
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            models_loaded: self.registry.loaded_count(),
            operations: Operation::ALL.iter().map(|op| op.name().to_string()).collect(),
            endpoints: Operation::ALL.iter().map(|op| op.route().to_string()).collect(),
        }
    }

    pub fn execute(&self, operation: Operation, payload: &JsonValue) -> ServiceResponse {
        match operation {
            Operation::PredictCycleLength => self.predict_cycle_length(payload).into_response(),
            Operation::PredictMensesLength => self.predict_menses_length(payload).into_response(),
            Operation::PredictNextPeriod => self.predict_next_period(payload).into_response(),
            Operation::DetectIrregularCycle => self.detect_irregular_cycle(payload).into_response(),
            Operation::PredictSymptoms => self.predict_symptoms(payload).into_response(),
            Operation::HealthCheck => encode(&self.health_check()),
            Operation::ServiceInfo => encode(&self.service_info()),
        }
    }

    /// Unknown operations yield a 404 envelope.
    pub fn dispatch(&self, operation: &str, payload: &JsonValue) -> ServiceResponse {
        match operation.parse::<Operation>() {
            Ok(op) => self.execute(op, payload),
            Err(e) => {
                info!("{}", e);
                ServiceResponse::error(404, e.to_string())
            }
        }
    }
}

fn encode<T: Serialize>(value: &T) -> ServiceResponse {
    match serde_json::to_value(value) {
        Ok(body) => ServiceResponse::ok(body),
        Err(e) => ServiceResponse::error(500, format!("Failed to encode response: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::testing::{BrokenRegressor, FixedClassifier, FixedRegressor};
    use crate::degradation::DEGRADED_MESSAGE;
    use crate::models::{Confidence, Outcome, RiskLevel};
    use crate::phase::CyclePhase;
    use serde_json::json;

    fn full_service() -> LunaService {
        LunaService::new(
            PredictorRegistry::empty()
                .with_regressor(PredictorSlot::CycleLength, Arc::new(FixedRegressor(vec![28.0])))
                .with_regressor(PredictorSlot::MensesLength, Arc::new(FixedRegressor(vec![5.2])))
                .with_regressor(PredictorSlot::NextPeriod, Arc::new(FixedRegressor(vec![28.0])))
                .with_classifier(PredictorSlot::IrregularCycle, Arc::new(FixedClassifier(0.83)))
                .with_regressor(
                    PredictorSlot::SymptomPredictor,
                    Arc::new(FixedRegressor(vec![6.2, 7.1, 4.0, 3.3, 5.5])),
                ),
        )
    }

    #[test]
    fn test_period_day_symptoms() {
        let result = full_service().predict_symptoms(&json!({
            "cycle_day": 2, "cycle_length": 28, "menses_length": 5
        }));
        assert!(result.is_served());
        assert_eq!(result.payload.phase, CyclePhase::Menstrual);
        assert_eq!(result.payload.confidence, Confidence::High);
    }

    #[test]
    fn test_pms_day_symptoms() {
        let result = full_service().predict_symptoms(&json!({
            "cycle_day": 26, "cycle_length": 28, "menses_length": 5
        }));
        assert_eq!(result.payload.phase, CyclePhase::Pms);
        assert_eq!(result.payload.phase_message, "3 days until period");
    }

    #[test]
    fn test_pcos_request() {
        let result = full_service().detect_irregular_cycle(&json!({
            "recent_cycle_lengths": [45, 38, 52, 41],
            "ovulation_detected": false,
            "bmi": 32,
            "unusual_bleeding": true
        }));
        assert!(result.is_served());
        assert_eq!(result.payload.pcos_risk_score, 4);
        assert_eq!(result.payload.pcos_risk_level, RiskLevel::High);
        assert!(result.payload.is_irregular);
    }

    #[test]
    fn test_next_period_wraps() {
        let result = full_service().predict_next_period(&json!({ "current_cycle_day": 30 }));
        assert_eq!(result.payload.days_until_next_period, 26);
        assert_eq!(result.payload.confidence, Confidence::Low);
    }

    #[test]
    fn test_missing_cycle_model_serves_fallback() {
        let service = LunaService::new(PredictorRegistry::empty());
        let response = service.dispatch("predict_cycle_length", &json!({}));
        assert_eq!(response.status, 500);
        assert_eq!(response.outcome, Some(Outcome::NotLoaded));
        assert_eq!(response.body["predicted_cycle_length"], 28.0);
        assert_eq!(response.body["confidence"], "low");
        assert_eq!(response.body["error"], "Cycle length model not loaded");
    }

    #[test]
    fn test_failing_predictor_degrades() {
        let service = LunaService::new(
            PredictorRegistry::empty()
                .with_regressor(PredictorSlot::MensesLength, Arc::new(BrokenRegressor)),
        );
        let result = service.predict_menses_length(&json!({ "Age": 30 }));
        assert_eq!(result.outcome, Outcome::Degraded);
        assert_eq!(result.payload.predicted_menses_length, 5.0);
        assert_eq!(result.payload.model_accuracy, "fallback");
    }

    #[test]
    fn test_degraded_responses_hide_internal_errors() {
        let service = LunaService::new(
            PredictorRegistry::empty()
                .with_regressor(PredictorSlot::MensesLength, Arc::new(BrokenRegressor)),
        );
        let response = service.dispatch("predict_menses_length", &json!({}));
        assert_eq!(response.outcome, Some(Outcome::Degraded));
        assert_eq!(response.body["error"], DEGRADED_MESSAGE);

        let response = full_service().dispatch("predict_symptoms", &json!({ "cycle_length": 0 }));
        let error = response.body["error"].as_str().unwrap_or_default();
        assert_eq!(error, DEGRADED_MESSAGE);
        assert!(!error.contains("cycle_day_ratio"));
    }

    #[test]
    fn test_zero_cycle_length_symptoms_degrade_with_request_phase() {
        let result = full_service().predict_symptoms(&json!({ "cycle_day": 1, "cycle_length": 0 }));
        assert_eq!(result.outcome, Outcome::Degraded);
        assert_eq!(result.payload.cramp_intensity, 2.0);
        assert_eq!(result.payload.phase, CyclePhase::Menstrual);
    }

    #[test]
    fn test_identical_requests_give_identical_output() {
        let service = full_service();
        let payload = json!({ "cycle_day": 14, "age": "31", "bmi": 22.5 });
        let first = service.dispatch("predict_symptoms", &payload);
        let second = service.dispatch("/predict/symptoms", &payload);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_non_object_payload_uses_defaults() {
        let response = full_service().dispatch("predict_cycle_length", &json!([1, 2, 3]));
        assert_eq!(response.status, 200);
        assert_eq!(response.body["predicted_cycle_length"], 28.0);
    }

    #[test]
    fn test_unknown_operation_is_404() {
        let response = full_service().dispatch("predict_mood", &json!({}));
        assert_eq!(response.status, 404);
        assert!(response.outcome.is_none());
    }

    #[test]
    fn test_health_report() {
        let healthy = full_service().health_check();
        assert_eq!(healthy.status, "healthy");
        assert_eq!(healthy.models_loaded, 5);
        assert_eq!(healthy.models["irregular_detection"], "AUC 1.000");

        let degraded = LunaService::new(PredictorRegistry::empty()).health_check();
        assert_eq!(degraded.status, "degraded");
        assert_eq!(degraded.models_loaded, 0);
        assert_eq!(degraded.models["cycle_length"], "Not loaded");
    }

    #[test]
    fn test_service_info_lists_operations() {
        let response = full_service().dispatch("/", &JsonValue::Null);
        assert_eq!(response.status, 200);
        assert_eq!(response.body["service"], SERVICE_NAME);
        assert_eq!(response.body["operations"][0], "predict_cycle_length");
        assert_eq!(response.body["models_loaded"], 5);
    }

    #[test]
    fn test_operation_parsing() {
        assert_eq!(
            "/detect/irregular-cycle".parse::<Operation>().unwrap(),
            Operation::DetectIrregularCycle
        );
        assert_eq!("health_check".parse::<Operation>().unwrap(), Operation::HealthCheck);
        assert!("".parse::<Operation>().is_err());
    }
}
