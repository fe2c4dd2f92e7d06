// src/entity.rs
// Per-camera classification entity: one predict call per processing tick,
// vendor response reshaped into a flat label -> confidence attribute map.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use crate::clarifai::PredictResponse;
use crate::config::{CameraSource, PlatformConfig};
use crate::error::VisionError;
use crate::events::{EventBus, FoundObjectEvent};
use crate::predictor::Predictor;

/// One attribute entry: classifier results carry a rounded confidence,
/// detector results carry the object label keyed by region index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Prediction {
    Score(f64),
    Label(String),
}

/// Label -> prediction map exposed as the entity attribute. BTreeMap keeps
/// the serialized order deterministic across cycles.
pub type Predictions = BTreeMap<String, Prediction>;

/// Reshape a predict response into the attribute map.
///
/// Classifier shape: keep at most `num_concepts` entries in the vendor's
/// ranked order, stopping at the first below `min_confidence`. Detector
/// shape: keep each region's top concept until one falls below the
/// threshold, keyed `detection {i}`. The second tuple slot lists the
/// detector labels that were kept, one found-object event each.
pub fn map_predictions(
    response: &PredictResponse,
    num_concepts: usize,
    min_confidence: f64,
) -> (Predictions, Vec<String>) {
    let mut predictions = Predictions::new();
    let mut found = Vec::new();

    let Some(output) = response.outputs.first() else {
        return (predictions, found);
    };

    if let Some(concepts) = &output.data.concepts {
        // classifier
        for concept in concepts.iter().take(num_concepts) {
            if concept.value < min_confidence {
                break;
            }
            predictions.insert(
                concept.name.clone(),
                Prediction::Score(round2(concept.value)),
            );
        }
    } else if let Some(regions) = &output.data.regions {
        // detector
        for (idx, region) in regions.iter().enumerate() {
            // A region without concepts ends the walk, same as one below
            // the threshold.
            let Some(top) = region.data.concepts.first() else {
                break;
            };
            if top.value < min_confidence {
                break;
            }
            predictions.insert(
                format!("detection {}", idx),
                Prediction::Label(top.name.clone()),
            );
            found.push(top.name.clone());
        }
    } else {
        tracing::warn!("predict response carried neither concepts nor regions");
    }

    (predictions, found)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Classification entity bound to one camera feed.
///
/// The hub serializes processing calls per entity, so the fields need no
/// locking: `predictions` and `state` are replaced together on each
/// successful cycle and never partially updated.
pub struct ClassificationEntity {
    camera_entity: String,
    name: String,
    num_concepts: usize,
    min_confidence: f64,
    predictor: Arc<dyn Predictor>,
    bus: EventBus,
    state: Option<u32>,
    predictions: Predictions,
}

impl ClassificationEntity {
    pub fn new(
        source: &CameraSource,
        config: &PlatformConfig,
        predictor: Arc<dyn Predictor>,
        bus: EventBus,
    ) -> Self {
        let name = source.name.clone().unwrap_or_else(|| {
            format!(
                "Clarifai {}, camera {}",
                config.model_name,
                object_id(&source.entity_id)
            )
        });

        Self {
            camera_entity: source.entity_id.clone(),
            name,
            num_concepts: config.num_concepts,
            min_confidence: config.min_confidence,
            predictor,
            bus,
            state: None,
            predictions: Predictions::new(),
        }
    }

    /// Camera entity this processor takes pictures from.
    pub fn camera_entity(&self) -> &str {
        &self.camera_entity
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sentinel marking that at least one cycle completed; not a
    /// classification result.
    pub fn state(&self) -> Option<u32> {
        self.state
    }

    pub fn predictions(&self) -> &Predictions {
        &self.predictions
    }

    /// Identifier carried by fired events, derived from the display name.
    pub fn entity_id(&self) -> String {
        format!("image_processing.{}", slugify(&self.name))
    }

    /// Attribute map exposed to the hub alongside the state.
    pub fn attributes(&self) -> serde_json::Value {
        json!({ "predictions": self.predictions })
    }

    /// Run one processing cycle against the camera snapshot.
    ///
    /// On success the predictions and state are overwritten together and a
    /// found-object event fires per kept detection region. On failure both
    /// are left untouched and the error propagates to the hub's per-tick
    /// handling.
    pub async fn process_image(&mut self, image: &[u8]) -> Result<(), VisionError> {
        let response = self.predictor.predict(image).await?;
        let (predictions, found) =
            map_predictions(&response, self.num_concepts, self.min_confidence);

        let entity_id = self.entity_id();
        for object in found {
            tracing::debug!(%object, %entity_id, "object found above threshold");
            self.bus.fire(FoundObjectEvent {
                object,
                entity_id: entity_id.clone(),
            });
        }

        self.predictions = predictions;
        self.state = Some(1);
        Ok(())
    }
}

/// Part after the domain of an entity id: `camera.porch` -> `porch`.
fn object_id(entity_id: &str) -> &str {
    entity_id
        .split_once('.')
        .map(|(_, rest)| rest)
        .unwrap_or(entity_id)
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_sep = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep && !slug.is_empty() {
            slug.push('_');
            last_was_sep = true;
        }
    }
    if slug.ends_with('_') {
        slug.pop();
    }
    slug
}
