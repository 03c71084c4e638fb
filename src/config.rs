use crate::error::AppError;
use crate::pipeline::types::TargetSize;
use config::{Config, Environment, File};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// How the aspect-fitted image is brought to the exact classifier input size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropPolicy {
    /// Scale until the target is covered, then crop the longer side symmetrically.
    #[default]
    CenterCrop,
    /// Stretch to the target, distorting the aspect ratio.
    ScaleFill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    #[default]
    CatmullRom,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Timings handed to the display surface, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationConfig {
    pub hint_text: String,
    pub hint_delay_ms: u64,
    pub show_delay_ms: u64,
    pub show_duration_ms: u64,
    pub hide_duration_ms: u64,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            hint_text: "choose or take a photo".to_string(),
            hint_delay_ms: 500,
            show_delay_ms: 100,
            show_duration_ms: 500,
            hide_duration_ms: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub target_size: TargetSize,
    pub confidence_threshold: f32,
    pub crop_policy: CropPolicy,
    pub resize_filter: ResizeFilter,
    pub classifier_timeout_ms: Option<u64>,
    pub completion_buffer_size: usize,
    pub presentation: PresentationConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            target_size: TargetSize::square(299),
            confidence_threshold: 0.8,
            crop_policy: CropPolicy::default(),
            resize_filter: ResizeFilter::default(),
            classifier_timeout_ms: None,
            completion_buffer_size: 16,
            presentation: PresentationConfig::default(),
        }
    }
}

impl Configuration {
    /// Layers defaults, an optional settings file and `SNACKS__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Configuration::default())?);
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let configuration: Configuration = builder
            .add_source(Environment::with_prefix("SNACKS").separator("__"))
            .build()?
            .try_deserialize()?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.target_size.width == 0 || self.target_size.height == 0 {
            return Err(AppError::Config(format!(
                "target size must be non-zero, got {}",
                self.target_size
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(AppError::Config(format!(
                "confidence threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.classifier_timeout_ms == Some(0) {
            return Err(AppError::Config(
                "classifier timeout must be positive when set".to_string(),
            ));
        }
        if self.completion_buffer_size == 0 {
            return Err(AppError::Config(
                "completion buffer size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn classifier_timeout(&self) -> Option<Duration> {
        self.classifier_timeout_ms.map(Duration::from_millis)
    }
}
