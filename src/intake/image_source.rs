use crate::error::AppError;
use crate::pipeline::types::SourceImage;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use tracing::debug;

/// Camera or photo library. `Ok(None)` means the user cancelled or nothing is left.
#[async_trait]
pub trait ImageSource: Send {
    async fn next_image(&mut self) -> Result<Option<SourceImage>, AppError>;
}

/// Picks photos from disk, one per call, in the order given.
#[derive(Debug, Default)]
pub struct FileImageSource {
    paths: VecDeque<PathBuf>,
}

impl FileImageSource {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

#[async_trait]
impl ImageSource for FileImageSource {
    async fn next_image(&mut self) -> Result<Option<SourceImage>, AppError> {
        let Some(path) = self.paths.pop_front() else {
            return Ok(None);
        };
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!("Decoding {}", path.display());

        let image = tokio::task::spawn_blocking(move || {
            image::open(&path).map_err(|e| AppError::Decode(format!("{}: {}", path.display(), e)))
        })
        .await
        .map_err(|e| AppError::Decode(e.to_string()))??;

        Ok(Some(SourceImage::new(name, image)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[tokio::test]
    async fn test_reads_images_in_order_then_stops() {
        let directory = std::env::temp_dir().join(format!("snacks-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&directory).unwrap();
        let first = directory.join("apple.png");
        let second = directory.join("carrot.png");
        ImageBuffer::from_pixel(6, 4, Rgb([255u8, 0, 0])).save(&first).unwrap();
        ImageBuffer::from_pixel(3, 9, Rgb([0u8, 255, 0])).save(&second).unwrap();

        let mut source = FileImageSource::new([first, second]);
        let apple = source.next_image().await.unwrap().unwrap();
        assert_eq!(apple.name, "apple.png");
        assert_eq!((apple.width(), apple.height()), (6, 4));

        let carrot = source.next_image().await.unwrap().unwrap();
        assert_eq!(carrot.name, "carrot.png");
        assert!(source.next_image().await.unwrap().is_none());

        std::fs::remove_dir_all(&directory).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_a_decode_error() {
        let mut source = FileImageSource::new([PathBuf::from("/nonexistent/snack.jpg")]);
        assert!(matches!(source.next_image().await, Err(AppError::Decode(_))));
        assert_eq!(source.remaining(), 0);
    }
}
