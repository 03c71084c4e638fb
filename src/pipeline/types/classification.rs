use crate::error::ClassifierError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

impl Classification {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Everything a classifier invocation can end in.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceOutcome {
    /// Ranked results, highest confidence first. May be empty.
    Results(Vec<Classification>),
    Failed(String),
    /// Neither results nor an error were produced.
    Unrecognized,
}

impl From<Result<Option<Vec<Classification>>, ClassifierError>> for InferenceOutcome {
    fn from(result: Result<Option<Vec<Classification>>, ClassifierError>) -> Self {
        match result {
            Ok(Some(results)) => InferenceOutcome::Results(results),
            Ok(None) => InferenceOutcome::Unrecognized,
            Err(e) => InferenceOutcome::Failed(e.to_string()),
        }
    }
}

/// A classifier's answer for one request generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierCompletion {
    pub generation: u64,
    pub classifier: String,
    pub outcome: InferenceOutcome,
}
