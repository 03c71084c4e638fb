mod classifier_service;
mod recorded_classifier;
#[cfg(test)]
pub(crate) mod scripted_classifier;

pub use classifier_service::{Classifier, ClassifierService, invoke};
pub use recorded_classifier::{RecordedClassifier, RecordedResponse};
