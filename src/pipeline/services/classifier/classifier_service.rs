use crate::error::ClassifierError;
use crate::pipeline::types::{Classification, InferenceOutcome, NormalizedBuffer};
use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tower::{Service, ServiceExt};
use tracing::{debug, instrument, warn};

/// An opaque image model. `Ok(None)` means the model produced neither results nor an error.
#[async_trait]
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    async fn classify(
        &self,
        buffer: Arc<NormalizedBuffer>,
    ) -> Result<Option<Vec<Classification>>, ClassifierError>;
}

#[derive(Clone)]
pub struct ClassifierService {
    inner: Arc<dyn Classifier>,
}

impl ClassifierService {
    pub fn new(inner: Arc<dyn Classifier>) -> Self {
        Self { inner }
    }
}

impl Service<Arc<NormalizedBuffer>> for ClassifierService {
    type Response = Option<Vec<Classification>>;
    type Error = ClassifierError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Arc<NormalizedBuffer>) -> Self::Future {
        let inner = self.inner.clone();
        Box::pin(async move { inner.classify(request).await })
    }
}

/// Runs one classifier invocation, bounded by `timeout` when one is configured.
///
/// A panicking classifier is reported as a failure so its line still reaches the display.
#[instrument(skip(classifier, buffer), fields(classifier = %classifier.name(), source = %buffer.source_name))]
pub async fn invoke(
    classifier: Arc<dyn Classifier>,
    buffer: Arc<NormalizedBuffer>,
    timeout: Option<Duration>,
) -> InferenceOutcome {
    let call = AssertUnwindSafe(ClassifierService::new(classifier).oneshot(buffer)).catch_unwind();
    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .unwrap_or(Ok(Err(ClassifierError::TimedOut(limit)))),
        None => call.await,
    }
    .unwrap_or_else(|panic| Err(ClassifierError::Invocation(panic_message(panic))));

    match &result {
        Ok(Some(results)) => debug!("Classifier returned {} results", results.len()),
        Ok(None) => debug!("Classifier returned no results and no error"),
        Err(e) => warn!("Classifier failed: {}", e),
    }
    InferenceOutcome::from(result)
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned());
    match detail {
        Some(detail) => format!("classifier panicked: {detail}"),
        None => "classifier panicked".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::services::classifier::scripted_classifier::{ScriptedClassifier, buffer};

    #[tokio::test]
    async fn test_invoke_passes_results_through() {
        let classifier = ScriptedClassifier::results("snacks", vec![Classification::new("apple", 0.95)]);
        let outcome = invoke(Arc::new(classifier), buffer("apple.jpg"), None).await;
        assert_eq!(
            outcome,
            InferenceOutcome::Results(vec![Classification::new("apple", 0.95)])
        );
    }

    #[tokio::test]
    async fn test_invoke_maps_errors_to_failed() {
        let classifier = ScriptedClassifier::failing("snacks", "network unavailable");
        let outcome = invoke(Arc::new(classifier), buffer("apple.jpg"), None).await;
        assert_eq!(
            outcome,
            InferenceOutcome::Failed("network unavailable".to_string())
        );
    }

    #[tokio::test]
    async fn test_invoke_without_results_is_unrecognized() {
        let classifier = ScriptedClassifier::silent("health");
        let outcome = invoke(Arc::new(classifier), buffer("apple.jpg"), None).await;
        assert_eq!(outcome, InferenceOutcome::Unrecognized);
    }

    #[tokio::test]
    async fn test_invoke_reports_panics_as_failures() {
        let classifier = ScriptedClassifier::panicking("snacks");
        let outcome = invoke(Arc::new(classifier), buffer("apple.jpg"), None).await;
        assert_eq!(
            outcome,
            InferenceOutcome::Failed("classifier panicked: model exploded".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_invoke_times_out() {
        let classifier = ScriptedClassifier::hanging("health");
        let timeout = Duration::from_millis(50);
        let outcome = invoke(Arc::new(classifier), buffer("apple.jpg"), Some(timeout)).await;
        assert_eq!(
            outcome,
            InferenceOutcome::Failed(ClassifierError::TimedOut(timeout).to_string())
        );
    }
}
