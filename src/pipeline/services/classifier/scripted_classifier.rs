use super::Classifier;
use crate::error::ClassifierError;
use crate::pipeline::types::{Classification, NormalizedBuffer};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

pub(crate) fn buffer(name: &str) -> Arc<NormalizedBuffer> {
    Arc::new(NormalizedBuffer {
        width: 1,
        height: 1,
        bytes_per_row: 4,
        data: vec![255, 0, 0, 0],
        source_id: Uuid::new_v4(),
        source_name: name.to_string(),
    })
}

/// Test double answering every request the same way, optionally after a delay.
pub(crate) struct ScriptedClassifier {
    name: String,
    delay: Option<Duration>,
    response: Option<Result<Option<Vec<Classification>>, ClassifierError>>,
    panics: bool,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    fn new(
        name: &str,
        response: Option<Result<Option<Vec<Classification>>, ClassifierError>>,
    ) -> Self {
        Self {
            name: name.to_string(),
            delay: None,
            response,
            panics: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn results(name: &str, results: Vec<Classification>) -> Self {
        Self::new(name, Some(Ok(Some(results))))
    }

    pub(crate) fn failing(name: &str, description: &str) -> Self {
        Self::new(
            name,
            Some(Err(ClassifierError::Invocation(description.to_string()))),
        )
    }

    pub(crate) fn silent(name: &str) -> Self {
        Self::new(name, Some(Ok(None)))
    }

    /// Never completes.
    pub(crate) fn hanging(name: &str) -> Self {
        Self::new(name, None)
    }

    pub(crate) fn panicking(name: &str) -> Self {
        Self {
            panics: true,
            ..Self::new(name, None)
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn classify(
        &self,
        _buffer: Arc<NormalizedBuffer>,
    ) -> Result<Option<Vec<Classification>>, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.panics {
            panic!("model exploded");
        }
        match &self.response {
            Some(response) => response.clone(),
            None => std::future::pending().await,
        }
    }
}
