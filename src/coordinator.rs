use crate::{
    app::display_surface::{DisplaySurface, TracingSurface, Transition},
    config::{Configuration, PresentationConfig},
    error::AppError,
    pipeline::{
        services::{Classifier, ImageNormalizer, NormalizerService, ResultSelector, invoke},
        session::ClassificationSession,
        types::{ClassifierCompletion, DisplaySnapshot, NormalizedBuffer, SourceImage, TargetSize},
    },
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use tracing::{debug, error, info};

enum SessionEvent {
    Begin { generation: u64, pending: usize },
    Completed(ClassifierCompletion),
}

/// Normalizes each submitted image once and fans it out to every classifier.
///
/// All display mutation happens on a single session task fed through a
/// channel, so concurrent classifier completions never race on the text.
pub struct ClassificationCoordinator {
    configuration: Configuration,
    normalizer: NormalizerService,
    classifiers: Vec<Arc<dyn Classifier>>,
    event_tx: mpsc::Sender<SessionEvent>,
    snapshot_rx: watch::Receiver<DisplaySnapshot>,
    session_task: JoinHandle<()>,
    generation: u64,
    request_token: CancellationToken,
    cancel_token: CancellationToken,
}

impl ClassificationCoordinator {
    fn new(
        configuration: Configuration,
        classifiers: Vec<Arc<dyn Classifier>>,
        surface: Arc<dyn DisplaySurface>,
    ) -> Self {
        let cancel_token = CancellationToken::new();
        let normalizer = NormalizerService::new(ImageNormalizer::from_configuration(&configuration));
        let session = ClassificationSession::new(
            ResultSelector::new(configuration.confidence_threshold),
            &configuration.presentation.hint_text,
        );
        let (event_tx, event_rx) = mpsc::channel(configuration.completion_buffer_size);
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
        let session_task = Self::start_session_task(
            session,
            surface,
            configuration.presentation.clone(),
            event_rx,
            snapshot_tx,
            cancel_token.clone(),
        );

        Self {
            request_token: cancel_token.child_token(),
            configuration,
            normalizer,
            classifiers,
            event_tx,
            snapshot_rx,
            session_task,
            generation: 0,
            cancel_token,
        }
    }

    fn start_session_task(
        mut session: ClassificationSession,
        surface: Arc<dyn DisplaySurface>,
        presentation: PresentationConfig,
        mut event_rx: mpsc::Receiver<SessionEvent>,
        snapshot_tx: watch::Sender<DisplaySnapshot>,
        cancel_token: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            surface.show(session.text().as_str(), Transition::hint(&presentation));
            session.reveal();
            snapshot_tx.send_replace(session.snapshot());

            loop {
                tokio::select! {
                    biased;
                    _ = cancel_token.cancelled() => break,
                    event = event_rx.recv() => {
                        match event {
                            Some(SessionEvent::Begin { generation, pending }) => {
                                session.begin(generation, pending);
                                surface.hide(Transition::hide(&presentation));
                            }
                            Some(SessionEvent::Completed(completion)) => {
                                if session.complete(&completion).is_none() {
                                    continue;
                                }
                                surface.show(session.text().as_str(), Transition::reveal(&presentation));
                            }
                            None => break,
                        }
                    }
                }
                snapshot_tx.send_replace(session.snapshot());
            }
            debug!("Session task finished");
        })
    }

    /// Starts classifying `image` and returns its generation without waiting for results.
    ///
    /// A normalization failure aborts only this attempt: the current display
    /// state and any classification still in flight are left alone.
    pub async fn submit(&mut self, image: SourceImage) -> Result<u64, AppError> {
        let name = image.name.clone();
        let buffer = self
            .normalizer
            .clone()
            .oneshot(image)
            .await
            .map_err(|e| {
                error!("Aborting classification of {}: {}", name, e);
                AppError::from(e)
            })?;
        let buffer = Arc::new(buffer);

        self.request_token.cancel();
        self.request_token = self.cancel_token.child_token();
        self.generation += 1;
        let generation = self.generation;

        self.event_tx
            .send(SessionEvent::Begin {
                generation,
                pending: self.classifiers.len(),
            })
            .await
            .map_err(|_| AppError::Coordinator("Session task has stopped".to_string()))?;

        for classifier in &self.classifiers {
            self.spawn_classification(generation, classifier.clone(), buffer.clone());
        }
        info!("Classifying {} as generation {}", name, generation);
        Ok(generation)
    }

    fn spawn_classification(
        &self,
        generation: u64,
        classifier: Arc<dyn Classifier>,
        buffer: Arc<NormalizedBuffer>,
    ) {
        let token = self.request_token.clone();
        let event_tx = self.event_tx.clone();
        let timeout = self.configuration.classifier_timeout();
        tokio::spawn(async move {
            let name = classifier.name().to_string();
            let outcome = tokio::select! {
                _ = token.cancelled() => {
                    debug!("{} superseded for generation {}", name, generation);
                    return;
                }
                outcome = invoke(classifier, buffer, timeout) => outcome,
            };
            if token.is_cancelled() {
                return;
            }
            let completion = ClassifierCompletion {
                generation,
                classifier: name,
                outcome,
            };
            if event_tx.send(SessionEvent::Completed(completion)).await.is_err() {
                debug!("Session closed before generation {} completed", generation);
            }
        });
    }

    /// Classifies `image` and waits until every classifier has reported.
    pub async fn classify(&mut self, image: SourceImage) -> Result<DisplaySnapshot, AppError> {
        let generation = self.submit(image).await?;
        let mut snapshot_rx = self.snapshot_rx.clone();
        let snapshot = snapshot_rx
            .wait_for(|snapshot| snapshot.generation == generation && snapshot.is_settled())
            .await
            .map_err(|_| AppError::Coordinator("Session task has stopped".to_string()))?
            .clone();
        Ok(snapshot)
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplaySnapshot> {
        self.snapshot_rx.clone()
    }

    pub fn stop(&self) {
        self.cancel_token.cancel();
        self.session_task.abort();
    }
}

impl Drop for ClassificationCoordinator {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct CoordinatorBuilder {
    configuration: Configuration,
    classifiers: Vec<Arc<dyn Classifier>>,
    surface: Option<Arc<dyn DisplaySurface>>,
}

impl CoordinatorBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            classifiers: Vec::new(),
            surface: None,
        }
    }

    // Sets the classifier input size, this will override the default configuration.
    pub fn target_size(mut self, target_size: TargetSize) -> Self {
        self.configuration.target_size = target_size;
        self
    }

    // Adjusts the confidence threshold, this will override the default configuration.
    pub fn confidence_threshold(mut self, confidence_threshold: f32) -> Self {
        self.configuration.confidence_threshold = confidence_threshold;
        self
    }

    // Bounds every classifier invocation, rounded up to whole milliseconds,
    // this will override the default configuration.
    pub fn classifier_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_nanos().div_ceil(1_000_000);
        self.configuration.classifier_timeout_ms = Some(u64::try_from(millis).unwrap_or(u64::MAX));
        self
    }

    pub fn classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifiers.push(classifier);
        self
    }

    pub fn surface(mut self, surface: Arc<dyn DisplaySurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Result<ClassificationCoordinator, AppError> {
        self.configuration.validate()?;
        if self.classifiers.is_empty() {
            return Err(AppError::Coordinator("Classifiers not set".to_string()));
        }
        let surface = self
            .surface
            .unwrap_or_else(|| Arc::new(TracingSurface));
        Ok(ClassificationCoordinator::new(
            self.configuration,
            self.classifiers,
            surface,
        ))
    }
}
