pub mod app;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod intake;
pub mod pipeline;

pub use crate::config::Configuration;
pub use crate::coordinator::{ClassificationCoordinator, CoordinatorBuilder};
pub use crate::error::{AppError, ClassifierError, NormalizeError};
