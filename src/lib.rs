// src/lib.rs
// Cloud image-recognition bridge: per-camera classification entities
// backed by the Clarifai predict API.

pub mod clarifai;
pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod platform;
pub mod predictor;

pub use clarifai::{ClarifaiClient, Concept, Output, OutputData, PredictResponse, Region};
pub use config::{CameraSource, ComponentConfig, PlatformConfig};
pub use entity::{map_predictions, ClassificationEntity, Prediction, Predictions};
pub use error::VisionError;
pub use events::{EventBus, FoundObjectEvent, EVENT_FOUND_OBJECT};
pub use platform::{setup_component, setup_platform};
pub use predictor::Predictor;
