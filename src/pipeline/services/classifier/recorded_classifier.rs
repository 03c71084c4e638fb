use super::Classifier;
use crate::error::{AppError, ClassifierError};
use crate::pipeline::types::{Classification, NormalizedBuffer};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// What the recorded model answered for one image.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecordedResponse {
    Failure { error: String },
    Predictions(Vec<Classification>),
    Unrecognized,
}

#[derive(Debug, Deserialize)]
struct Recording {
    name: String,
    #[serde(default)]
    latency_ms: u64,
    #[serde(default)]
    responses: HashMap<String, RecordedResponse>,
}

/// Replays a model's answers from a JSON recording keyed by image name.
///
/// ```json
/// {
///   "name": "snacks",
///   "latency_ms": 20,
///   "responses": {
///     "apple.jpg": [{ "label": "apple", "confidence": 0.95 }],
///     "blurry.jpg": { "error": "model unavailable" }
///   }
/// }
/// ```
///
/// Images missing from the recording get an empty result.
#[derive(Debug)]
pub struct RecordedClassifier {
    name: String,
    latency: Duration,
    responses: HashMap<String, RecordedResponse>,
}

impl RecordedClassifier {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Self::parse(json).map_err(|e| AppError::Fixture(e.to_string()))
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await?;
        Self::parse(&json).map_err(|e| AppError::Fixture(format!("{}: {}", path.display(), e)))
    }

    fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let recording: Recording = serde_json::from_str(json)?;
        let responses = recording
            .responses
            .into_iter()
            .map(|(image, response)| (image, ranked(response)))
            .collect();
        Ok(Self {
            name: recording.name,
            latency: Duration::from_millis(recording.latency_ms),
            responses,
        })
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

fn ranked(response: RecordedResponse) -> RecordedResponse {
    match response {
        RecordedResponse::Predictions(mut predictions) => {
            predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
            RecordedResponse::Predictions(predictions)
        }
        other => other,
    }
}

#[async_trait]
impl Classifier for RecordedClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn classify(
        &self,
        buffer: Arc<NormalizedBuffer>,
    ) -> Result<Option<Vec<Classification>>, ClassifierError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match self.responses.get(&buffer.source_name) {
            Some(RecordedResponse::Predictions(predictions)) => Ok(Some(predictions.clone())),
            Some(RecordedResponse::Failure { error }) => {
                Err(ClassifierError::Invocation(error.clone()))
            }
            Some(RecordedResponse::Unrecognized) => Ok(None),
            None => {
                debug!("No recording for {}", buffer.source_name);
                Ok(Some(Vec::new()))
            }
        }
    }
}
