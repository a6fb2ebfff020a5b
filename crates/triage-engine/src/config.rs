use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Current config version. Bump this when changing the shape of the file.
const CURRENT_VERSION: u32 = 1;

fn default_vitals_weight() -> f64 {
    0.6
}

fn default_image_weight() -> f64 {
    0.4
}

fn default_top_n() -> usize {
    5
}

fn default_repository_timeout_ms() -> u64 {
    2_000
}

/// Tunables for the orchestrator. Every field has a default, so an empty
/// JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default = "default_vitals_weight")]
    pub vitals_weight: f64,
    #[serde(default = "default_image_weight")]
    pub image_weight: f64,
    /// Hospitals returned when the caller does not ask for a specific count.
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
    /// Upper bound on every repository call.
    #[serde(default = "default_repository_timeout_ms")]
    pub repository_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            vitals_weight: default_vitals_weight(),
            image_weight: default_image_weight(),
            default_top_n: default_top_n(),
            repository_timeout_ms: default_repository_timeout_ms(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(contents: &str) -> Result<Self, EngineError> {
        let config: EngineConfig =
            serde_json::from_str(contents).map_err(|e| EngineError::Config(e.to_string()))?;

        if config.config_version > CURRENT_VERSION {
            return Err(EngineError::Config(format!(
                "config_version {} is newer than this build supports ({CURRENT_VERSION})",
                config.config_version
            )));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!("failed to read config at {}: {e}", path.display()))
        })?;
        let config = Self::from_json(&contents)?;
        tracing::info!(path = %path.display(), "engine config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, weight) in [
            ("vitals_weight", self.vitals_weight),
            ("image_weight", self.image_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(EngineError::Config(format!(
                    "{name} must be a non-negative number, got {weight}"
                )));
            }
        }
        if self.vitals_weight + self.image_weight <= 0.0 {
            return Err(EngineError::Config(
                "fusion weights must not both be zero".to_string(),
            ));
        }
        if self.repository_timeout_ms == 0 {
            return Err(EngineError::Config(
                "repository_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn repository_timeout(&self) -> Duration {
        Duration::from_millis(self.repository_timeout_ms)
    }
}
