// src/config.rs
// Component and platform configuration with the hub schema's defaults.

use serde::Deserialize;

use crate::error::VisionError;

/// Model used when the platform config names none.
pub const DEFAULT_MODEL: &str = "general";

/// Maximum concepts kept per processing cycle.
pub const DEFAULT_NUM_CONCEPTS: usize = 5;

/// Minimum confidence a concept needs to be kept.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.9;

/// Component-level configuration: one API key shared by every platform.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentConfig {
    pub api_key: String,
}

/// One camera feed to attach a classification entity to.
#[derive(Debug, Clone, Deserialize)]
pub struct CameraSource {
    /// Camera entity id, e.g. `camera.front_porch`.
    pub entity_id: String,
    /// Display name override; a default is derived from the model and
    /// camera when absent.
    #[serde(default)]
    pub name: Option<String>,
}

/// Platform configuration for a set of classification entities.
///
/// Immutable after setup. `api_key` may be left empty in the file and
/// filled from the environment before `validate` runs.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model_name: String,
    #[serde(default = "default_num_concepts")]
    pub num_concepts: usize,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    pub source: Vec<CameraSource>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_num_concepts() -> usize {
    DEFAULT_NUM_CONCEPTS
}

fn default_min_confidence() -> f64 {
    DEFAULT_MIN_CONFIDENCE
}

impl PlatformConfig {
    /// Check the fields the hub schema would reject, before any network call.
    pub fn validate(&self) -> Result<(), VisionError> {
        if self.api_key.trim().is_empty() {
            return Err(VisionError::Config("api_key must not be empty".into()));
        }
        if self.source.is_empty() {
            return Err(VisionError::Config(
                "at least one camera source is required".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(VisionError::Config(format!(
                "min_confidence must be within 0.0..=1.0, got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config: PlatformConfig = serde_json::from_str(
            r#"{
                "api_key": "secret",
                "source": [{"entity_id": "camera.front_porch"}]
            }"#,
        )
        .unwrap();

        assert_eq!(config.model_name, "general");
        assert_eq!(config.num_concepts, 5);
        assert_eq!(config.min_confidence, 0.9);
        assert!(config.source[0].name.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_values_win() {
        let config: PlatformConfig = serde_json::from_str(
            r#"{
                "api_key": "secret",
                "model_name": "food",
                "num_concepts": 3,
                "min_confidence": 0.5,
                "source": [{"entity_id": "camera.kitchen", "name": "Fridge watcher"}]
            }"#,
        )
        .unwrap();

        assert_eq!(config.model_name, "food");
        assert_eq!(config.num_concepts, 3);
        assert_eq!(config.min_confidence, 0.5);
        assert_eq!(config.source[0].name.as_deref(), Some("Fridge watcher"));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let config: PlatformConfig = serde_json::from_str(
            r#"{"source": [{"entity_id": "camera.yard"}]}"#,
        )
        .unwrap();

        assert!(matches!(config.validate(), Err(VisionError::Config(_))));
    }

    #[test]
    fn test_empty_source_rejected() {
        let config: PlatformConfig =
            serde_json::from_str(r#"{"api_key": "secret", "source": []}"#).unwrap();

        assert!(matches!(config.validate(), Err(VisionError::Config(_))));
    }

    #[test]
    fn test_min_confidence_out_of_range_rejected() {
        let config: PlatformConfig = serde_json::from_str(
            r#"{
                "api_key": "secret",
                "min_confidence": 1.5,
                "source": [{"entity_id": "camera.yard"}]
            }"#,
        )
        .unwrap();

        assert!(matches!(config.validate(), Err(VisionError::Config(_))));
    }
}
