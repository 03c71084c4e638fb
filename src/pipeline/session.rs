use crate::pipeline::services::ResultSelector;
use crate::pipeline::types::{ClassifierCompletion, DisplaySnapshot, DisplayText};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingClassifiers { generation: u64, pending: usize },
}

/// Display state for the image currently being classified.
///
/// Only completions carrying the current generation are applied, each one
/// appending exactly one line.
#[derive(Debug)]
pub struct ClassificationSession {
    state: SessionState,
    generation: u64,
    text: DisplayText,
    visible: bool,
    selector: ResultSelector,
}

impl ClassificationSession {
    pub fn new(selector: ResultSelector, hint: &str) -> Self {
        Self {
            state: SessionState::Idle,
            generation: 0,
            text: DisplayText::new(hint),
            visible: false,
            selector,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn text(&self) -> &DisplayText {
        &self.text
    }

    pub fn reveal(&mut self) {
        self.visible = true;
    }

    /// Starts a new image: clears the text and hides the result surface.
    pub fn begin(&mut self, generation: u64, pending: usize) {
        if let SessionState::AwaitingClassifiers {
            generation: previous,
            pending: outstanding,
        } = self.state
        {
            debug!(
                "Generation {} supersedes {} with {} classifiers outstanding",
                generation, previous, outstanding
            );
        }
        self.generation = generation;
        self.text.clear();
        self.visible = false;
        self.state = if pending == 0 {
            SessionState::Idle
        } else {
            SessionState::AwaitingClassifiers {
                generation,
                pending,
            }
        };
    }

    /// Applies a classifier answer, returning the appended line or `None` when discarded.
    pub fn complete(&mut self, completion: &ClassifierCompletion) -> Option<String> {
        match self.state {
            SessionState::AwaitingClassifiers {
                generation,
                pending,
            } if generation == completion.generation => {
                let line = self.selector.describe(&completion.outcome);
                self.text.push_line(&line);
                self.visible = true;
                self.state = if pending > 1 {
                    SessionState::AwaitingClassifiers {
                        generation,
                        pending: pending - 1,
                    }
                } else {
                    SessionState::Idle
                };
                Some(line)
            }
            _ => {
                debug!(
                    "Discarding {} result for generation {} (current {})",
                    completion.classifier, completion.generation, self.generation
                );
                None
            }
        }
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        let pending = match self.state {
            SessionState::Idle => 0,
            SessionState::AwaitingClassifiers { pending, .. } => pending,
        };
        DisplaySnapshot {
            generation: self.generation,
            text: self.text.clone(),
            visible: self.visible,
            pending,
        }
    }
}
