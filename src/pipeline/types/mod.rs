mod classification;
mod display;
mod normalized_buffer;
mod source_image;

pub use classification::{Classification, ClassifierCompletion, InferenceOutcome};
pub use display::{DisplaySnapshot, DisplayText};
pub use normalized_buffer::{BYTES_PER_PIXEL, NormalizedBuffer};
pub use source_image::{SourceImage, TargetSize};
