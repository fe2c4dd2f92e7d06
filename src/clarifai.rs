// src/clarifai.rs
// Clarifai predict client: one POST per processing cycle, base64 image payload.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::VisionError;
use crate::predictor::Predictor;

const DEFAULT_BASE_URL: &str = "https://api.clarifai.com/v2";

#[derive(Serialize)]
struct PredictRequest {
    inputs: Vec<Input>,
}

#[derive(Serialize)]
struct Input {
    data: InputData,
}

#[derive(Serialize)]
struct InputData {
    image: ImagePayload,
}

#[derive(Serialize)]
struct ImagePayload {
    base64: String,
}

/// A vendor-returned label with its confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub name: String,
    pub value: f64,
}

/// A detector bounding area carrying its own ranked concept list,
/// best concept first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub data: RegionData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionData {
    #[serde(default)]
    pub concepts: Vec<Concept>,
}

/// The two mutually exclusive response shapes. Both fields are optional so
/// either shape, neither, or something unknown deserializes without error;
/// the schema is the vendor's, not ours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concepts: Option<Vec<Concept>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<Region>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Output {
    #[serde(default)]
    pub data: OutputData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub outputs: Vec<Output>,
}

/// Client bound to one API key and one named model.
#[derive(Debug, Clone)]
pub struct ClarifaiClient {
    http: reqwest::Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl ClarifaiClient {
    pub fn new(api_key: &str, model_name: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model_name: model_name.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API root. Used by tests.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Send one image to the model's predict endpoint.
    ///
    /// No retry and no backoff: the hub's per-tick error handling owns
    /// failures, this call just reports them.
    pub async fn predict_by_bytes(&self, image: &[u8]) -> Result<PredictResponse, VisionError> {
        let request = PredictRequest {
            inputs: vec![Input {
                data: InputData {
                    image: ImagePayload {
                        base64: general_purpose::STANDARD.encode(image),
                    },
                },
            }],
        };

        let url = format!("{}/models/{}/outputs", self.base_url, self.model_name);
        tracing::debug!(model = %self.model_name, bytes = image.len(), "sending predict request");

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Key {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::Api { status, body });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Predictor for ClarifaiClient {
    async fn predict(&self, image: &[u8]) -> Result<PredictResponse, VisionError> {
        self.predict_by_bytes(image).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let request = PredictRequest {
            inputs: vec![Input {
                data: InputData {
                    image: ImagePayload {
                        base64: general_purpose::STANDARD.encode(b"fake image bytes"),
                    },
                },
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        let encoded = value["inputs"][0]["data"]["image"]["base64"]
            .as_str()
            .unwrap();
        let decoded = general_purpose::STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, b"fake image bytes");
    }

    #[test]
    fn test_classifier_response_deserializes() {
        let raw = json!({
            "status": {"code": 10000, "description": "Ok"},
            "outputs": [{
                "id": "abc",
                "data": {
                    "concepts": [
                        {"id": "c1", "name": "dog", "value": 0.98},
                        {"id": "c2", "name": "animal", "value": 0.97}
                    ]
                }
            }]
        });

        let response: PredictResponse = serde_json::from_value(raw).unwrap();
        let concepts = response.outputs[0].data.concepts.as_ref().unwrap();
        assert_eq!(concepts[0].name, "dog");
        assert_eq!(concepts[0].value, 0.98);
        assert!(response.outputs[0].data.regions.is_none());
    }

    #[test]
    fn test_detector_response_deserializes() {
        let raw = json!({
            "outputs": [{
                "data": {
                    "regions": [{
                        "region_info": {"bounding_box": {"top_row": 0.1}},
                        "data": {"concepts": [{"name": "face", "value": 0.99}]}
                    }]
                }
            }]
        });

        let response: PredictResponse = serde_json::from_value(raw).unwrap();
        let regions = response.outputs[0].data.regions.as_ref().unwrap();
        assert_eq!(regions[0].data.concepts[0].name, "face");
        assert!(response.outputs[0].data.concepts.is_none());
    }

    #[test]
    fn test_unknown_shape_still_deserializes() {
        let raw = json!({
            "outputs": [{"data": {"clusters": [{"id": "k1"}]}}]
        });

        let response: PredictResponse = serde_json::from_value(raw).unwrap();
        assert!(response.outputs[0].data.concepts.is_none());
        assert!(response.outputs[0].data.regions.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ClarifaiClient::new("key", "general").with_base_url("http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
