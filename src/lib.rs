// src/lib.rs
pub mod aggregator;
pub mod batch;
pub mod degradation;
pub mod features;
pub mod models;
pub mod phase;
pub mod predictors;
pub mod risk;
pub mod service;
pub mod utils;

pub use predictors::{PredictionError, PredictorRegistry, PredictorSlot};
pub use service::{LunaService, Operation};
