// src/predictors/registry.rs
use log::{error, info};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::loader::{load_predictor, LoadedPredictor};
use super::{Classifier, PredictionError, PredictorSlot, Regressor};

/// The five predictors, built once before serving and read-only afterwards.
///
/// Each slot loads independently; a slot that failed to load is simply absent.
#[derive(Clone, Default)]
pub struct PredictorRegistry {
    regressors: HashMap<PredictorSlot, Arc<dyn Regressor>>,
    classifiers: HashMap<PredictorSlot, Arc<dyn Classifier>>,
    load_failures: HashMap<PredictorSlot, String>,
}

impl PredictorRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads every slot from `dir`. Never fails; failures are logged and recorded.
    pub fn load_from_dir(dir: &Path) -> Self {
        info!("Loading predictors from {}", dir.display());
        let mut registry = Self::empty();
        for slot in PredictorSlot::ALL {
            let path = dir.join(slot.file_name());
            match load_predictor(slot, &path) {
                Ok(LoadedPredictor::Regressor(model)) => {
                    info!("✅ {} loaded from {}", slot, path.display());
                    registry.regressors.insert(slot, model);
                }
                Ok(LoadedPredictor::Classifier(model)) => {
                    info!("✅ {} loaded from {}", slot, path.display());
                    registry.classifiers.insert(slot, model);
                }
                Err(e) => {
                    error!("❌ {} failed to load: {:#}", slot, e);
                    registry.load_failures.insert(slot, format!("{:#}", e));
                }
            }
        }
        info!(
            "Loaded {}/{} predictors",
            registry.loaded_count(),
            PredictorSlot::ALL.len()
        );
        registry
    }

    pub fn with_regressor(mut self, slot: PredictorSlot, model: Arc<dyn Regressor>) -> Self {
        self.load_failures.remove(&slot);
        self.regressors.insert(slot, model);
        self
    }

    pub fn with_classifier(mut self, slot: PredictorSlot, model: Arc<dyn Classifier>) -> Self {
        self.load_failures.remove(&slot);
        self.classifiers.insert(slot, model);
        self
    }

    pub fn regressor(&self, slot: PredictorSlot) -> Result<Arc<dyn Regressor>, PredictionError> {
        self.regressors
            .get(&slot)
            .cloned()
            .ok_or(PredictionError::NotLoaded(slot))
    }

    pub fn classifier(&self, slot: PredictorSlot) -> Result<Arc<dyn Classifier>, PredictionError> {
        self.classifiers
            .get(&slot)
            .cloned()
            .ok_or(PredictionError::NotLoaded(slot))
    }

    pub fn is_loaded(&self, slot: PredictorSlot) -> bool {
        self.regressors.contains_key(&slot) || self.classifiers.contains_key(&slot)
    }

    pub fn loaded_count(&self) -> usize {
        PredictorSlot::ALL
            .iter()
            .filter(|slot| self.is_loaded(**slot))
            .count()
    }

    pub fn load_failure(&self, slot: PredictorSlot) -> Option<&str> {
        self.load_failures.get(&slot).map(String::as_str)
    }

    /// Per-slot availability in slot order.
    pub fn availability(&self) -> Vec<(PredictorSlot, bool)> {
        PredictorSlot::ALL
            .iter()
            .map(|slot| (*slot, self.is_loaded(*slot)))
            .collect()
    }
}

impl fmt::Debug for PredictorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loaded: Vec<&str> = PredictorSlot::ALL
            .iter()
            .filter(|slot| self.is_loaded(**slot))
            .map(|slot| slot.as_str())
            .collect();
        f.debug_struct("PredictorRegistry")
            .field("loaded", &loaded)
            .field("load_failures", &self.load_failures)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureVector;
    use serde_json::json;
    use std::fs;

    struct Constant(f64);

    impl Regressor for Constant {
        fn output_len(&self) -> usize {
            1
        }
        fn predict(&self, _features: &FeatureVector) -> anyhow::Result<Vec<f64>> {
            Ok(vec![self.0])
        }
    }

    #[test]
    fn test_empty_registry_reports_not_loaded() {
        let registry = PredictorRegistry::empty();
        assert_eq!(registry.loaded_count(), 0);
        assert_eq!(
            registry.regressor(PredictorSlot::CycleLength).err(),
            Some(PredictionError::NotLoaded(PredictorSlot::CycleLength))
        );
        assert!(registry.classifier(PredictorSlot::IrregularCycle).is_err());
    }

    #[test]
    fn test_with_regressor() {
        let registry =
            PredictorRegistry::empty().with_regressor(PredictorSlot::CycleLength, Arc::new(Constant(28.0)));
        assert!(registry.is_loaded(PredictorSlot::CycleLength));
        assert!(!registry.is_loaded(PredictorSlot::MensesLength));
        assert_eq!(registry.loaded_count(), 1);
        assert_eq!(registry.availability()[0], (PredictorSlot::CycleLength, true));
    }

    #[test]
    fn test_load_from_dir_loads_slots_independently() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("menses_length_model.json"),
            json!({
                "model_type": "linear",
                "feature_names": ["Age", "BMI", "LengthofCycle", "MeanBleedingIntensity", "EstimatedDayofOvulation"],
                "weights": [[0.0, 0.0, 0.0, 0.0, 0.0]],
                "intercepts": [5.0]
            })
            .to_string(),
        )
        .unwrap();
        fs::write(dir.path().join("cycle_length_model.json"), "not json").unwrap();

        let registry = PredictorRegistry::load_from_dir(dir.path());
        assert!(registry.is_loaded(PredictorSlot::MensesLength));
        assert!(!registry.is_loaded(PredictorSlot::CycleLength));
        assert!(registry.load_failure(PredictorSlot::CycleLength).is_some());
        assert!(registry.load_failure(PredictorSlot::SymptomPredictor).is_some());
        assert_eq!(registry.loaded_count(), 1);
    }
}
