pub mod classifier;
pub mod normalizer;
pub mod result_selector;

pub use classifier::{Classifier, ClassifierService, RecordedClassifier, RecordedResponse, invoke};
pub use normalizer::{ImageNormalizer, NormalizerService, scale_factor, scaled_size};
pub use result_selector::{ResultSelector, describe, select};
