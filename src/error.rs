use std::time::Duration;
use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Normalization Error: {0}")]
    Normalize(#[from] NormalizeError),
    #[error("Classifier Error: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("Configuration Error: {0}")]
    Config(String),
    #[error("Failed to decode image {0}")]
    Decode(String),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid fixture: {0}")]
    Fixture(String),
    #[error("Coordinator Error: {0}")]
    Coordinator(String),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

// Normalizer Error Type, scoped to a single classification attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Failed to allocate pixel buffer: {0}")]
    Allocation(String),
    #[error("Failed to render image: {0}")]
    Render(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    #[error("{0}")]
    Invocation(String),
    #[error("classifier timed out after {0:?}")]
    TimedOut(Duration),
}
