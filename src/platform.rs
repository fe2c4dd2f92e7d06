// src/platform.rs
// Component and platform setup: shared vendor client, one entity per camera.

use std::sync::Arc;

use crate::clarifai::ClarifaiClient;
use crate::config::{ComponentConfig, PlatformConfig, DEFAULT_MODEL};
use crate::entity::ClassificationEntity;
use crate::error::VisionError;
use crate::events::EventBus;
use crate::predictor::Predictor;

/// Component-level setup: a client bound to the general model, shared by
/// anything that only needs the default classifier.
pub fn setup_component(config: &ComponentConfig) -> Result<ClarifaiClient, VisionError> {
    if config.api_key.trim().is_empty() {
        return Err(VisionError::Config("api_key must not be empty".into()));
    }
    Ok(ClarifaiClient::new(&config.api_key, DEFAULT_MODEL))
}

/// Platform setup: validate the config and create one classification
/// entity per configured camera, all sharing a single client.
pub fn setup_platform(
    config: &PlatformConfig,
    bus: EventBus,
) -> Result<Vec<ClassificationEntity>, VisionError> {
    config.validate()?;

    let client: Arc<dyn Predictor> =
        Arc::new(ClarifaiClient::new(&config.api_key, &config.model_name));
    tracing::info!(
        model = %config.model_name,
        cameras = config.source.len(),
        "setting up classification entities"
    );

    Ok(config
        .source
        .iter()
        .map(|source| {
            ClassificationEntity::new(source, config, Arc::clone(&client), bus.clone())
        })
        .collect())
}
