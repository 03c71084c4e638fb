pub mod services;
pub mod session;
pub mod types;

pub use services::{Classifier, ImageNormalizer, NormalizerService, RecordedClassifier, ResultSelector};
pub use session::{ClassificationSession, SessionState};
pub use types::{
    Classification, ClassifierCompletion, DisplaySnapshot, DisplayText, InferenceOutcome,
    NormalizedBuffer, SourceImage, TargetSize,
};
