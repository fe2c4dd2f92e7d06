// src/predictor.rs

use async_trait::async_trait;

use crate::clarifai::PredictResponse;
use crate::error::VisionError;

/// The one capability an entity needs from the vendor: raw image bytes in,
/// predict response out. Entities hold this instead of the concrete client
/// so tests can substitute a canned backend.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, image: &[u8]) -> Result<PredictResponse, VisionError>;
}
