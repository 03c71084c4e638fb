use image::DynamicImage;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A decoded photo as handed over by the image source.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub image: Arc<DynamicImage>,
    pub id: Uuid,
    pub name: String,
}

impl SourceImage {
    pub fn new(name: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            image: Arc::new(image),
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(dimension: u32) -> Self {
        Self::new(dimension, dimension)
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
