// src/utils/service_config.rs
use log::info;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL_DIR: &str = "models";

/// Runtime configuration for the prediction service, read from the environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding one parameter file per predictor slot
    pub model_dir: PathBuf,
    /// Maximum number of requests evaluated at once in batch mode
    pub batch_concurrency: usize,
    /// Whether batch mode shows a progress bar
    pub progress_enabled: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            batch_concurrency: num_cpus::get().max(1),
            progress_enabled: true,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let model_dir = env::var("LUNA_MODEL_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.model_dir);

        let batch_concurrency = env::var("LUNA_BATCH_CONCURRENCY")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.batch_concurrency);

        let progress_enabled = env::var("LUNA_PROGRESS_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .unwrap_or(true);

        Self {
            model_dir,
            batch_concurrency,
            progress_enabled,
        }
    }

    pub fn log_config(&self) {
        info!("⚙️  Model directory: {}", self.model_dir.display());
        info!("⚙️  Batch concurrency: {}", self.batch_concurrency);
        info!(
            "⚙️  Progress bars: {}",
            if self.progress_enabled { "enabled" } else { "disabled" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.model_dir, PathBuf::from("models"));
        assert!(config.batch_concurrency >= 1);
        assert!(config.progress_enabled);
    }

    // Single test so the environment is not mutated concurrently.
    #[test]
    fn test_env_config() {
        env::set_var("LUNA_MODEL_DIR", "/srv/luna/models");
        env::set_var("LUNA_BATCH_CONCURRENCY", "3");
        env::set_var("LUNA_PROGRESS_ENABLED", "false");

        let config = ServiceConfig::from_env();
        assert_eq!(config.model_dir, PathBuf::from("/srv/luna/models"));
        assert_eq!(config.batch_concurrency, 3);
        assert!(!config.progress_enabled);

        // Unparseable values fall back to defaults
        env::set_var("LUNA_BATCH_CONCURRENCY", "zero");
        env::set_var("LUNA_PROGRESS_ENABLED", "maybe");
        env::set_var("LUNA_MODEL_DIR", "  ");
        let config = ServiceConfig::from_env();
        assert_eq!(config.model_dir, PathBuf::from(DEFAULT_MODEL_DIR));
        assert_eq!(config.batch_concurrency, ServiceConfig::default().batch_concurrency);
        assert!(config.progress_enabled);

        env::remove_var("LUNA_MODEL_DIR");
        env::remove_var("LUNA_BATCH_CONCURRENCY");
        env::remove_var("LUNA_PROGRESS_ENABLED");
    }
}
