use crate::config::{Configuration, CropPolicy, ResizeFilter};
use crate::error::NormalizeError;
use crate::pipeline::types::{BYTES_PER_PIXEL, NormalizedBuffer, SourceImage, TargetSize};
use futures::future::BoxFuture;
use image::RgbImage;
use image::imageops::{self, FilterType};
use std::task::{Context, Poll};
use tower::Service;
use tracing::{debug, instrument};

/// Uniform factor that makes the image fit inside `target` without cropping.
pub fn scale_factor(width: u32, height: u32, target: TargetSize) -> f64 {
    let width_ratio = target.width as f64 / width as f64;
    let height_ratio = target.height as f64 / height as f64;
    width_ratio.min(height_ratio)
}

/// Size of the aspect-preserving fit, rounded and kept within `1..=target`.
pub fn scaled_size(width: u32, height: u32, target: TargetSize) -> (u32, u32) {
    let factor = scale_factor(width, height, target);
    let scaled_width = ((width as f64 * factor).round() as u32)
        .max(1)
        .min(target.width);
    let scaled_height = ((height as f64 * factor).round() as u32)
        .max(1)
        .min(target.height);
    (scaled_width, scaled_height)
}

/// Turns arbitrary photos into the fixed ARGB input the classifiers expect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageNormalizer {
    target: TargetSize,
    crop_policy: CropPolicy,
    filter: ResizeFilter,
}

impl ImageNormalizer {
    pub fn new(target: TargetSize) -> Self {
        Self {
            target,
            crop_policy: CropPolicy::default(),
            filter: ResizeFilter::default(),
        }
    }

    pub fn from_configuration(configuration: &Configuration) -> Self {
        Self::new(configuration.target_size)
            .with_crop_policy(configuration.crop_policy)
            .with_filter(configuration.resize_filter)
    }

    pub fn with_crop_policy(mut self, crop_policy: CropPolicy) -> Self {
        self.crop_policy = crop_policy;
        self
    }

    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    #[instrument(skip(self, source), fields(source = %source.name))]
    pub fn normalize(&self, source: &SourceImage) -> Result<NormalizedBuffer, NormalizeError> {
        if self.target.width == 0 || self.target.height == 0 {
            return Err(NormalizeError::Allocation(format!(
                "invalid target size {}",
                self.target
            )));
        }
        let (width, height) = (source.width(), source.height());
        if width == 0 || height == 0 {
            return Err(NormalizeError::Render(format!(
                "cannot create a drawing surface for a {width}x{height} image"
            )));
        }

        let filter = FilterType::from(self.filter);
        let (fit_width, fit_height) = scaled_size(width, height, self.target);
        debug!(
            "Scaling {}x{} to {}x{} (factor {:.4})",
            width,
            height,
            fit_width,
            fit_height,
            scale_factor(width, height, self.target)
        );
        let fitted = source
            .image
            .resize_exact(fit_width, fit_height, filter)
            .to_rgb8();

        let rendered = match self.crop_policy {
            CropPolicy::CenterCrop => center_crop(fitted, self.target, filter),
            CropPolicy::ScaleFill => {
                imageops::resize(&fitted, self.target.width, self.target.height, filter)
            }
        };

        render_argb(&rendered, source)
    }
}

/// Cuts the centered region that covers `target` once scaled, then scales it up to `target`.
fn center_crop(image: RgbImage, target: TargetSize, filter: FilterType) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == target.width && height == target.height {
        return image;
    }
    let cover = (target.width as f64 / width as f64).max(target.height as f64 / height as f64);
    let crop_width = ((target.width as f64 / cover).round() as u32).clamp(1, width);
    let crop_height = ((target.height as f64 / cover).round() as u32).clamp(1, height);

    let x = (width - crop_width) / 2;
    let y = (height - crop_height) / 2;
    let cropped = imageops::crop_imm(&image, x, y, crop_width, crop_height).to_image();
    imageops::resize(&cropped, target.width, target.height, filter)
}

fn render_argb(image: &RgbImage, source: &SourceImage) -> Result<NormalizedBuffer, NormalizeError> {
    let (width, height) = image.dimensions();
    let bytes_per_row = (width as usize)
        .checked_mul(BYTES_PER_PIXEL)
        .ok_or_else(|| NormalizeError::Allocation(format!("row of {width} pixels overflows")))?;
    let length = bytes_per_row.checked_mul(height as usize).ok_or_else(|| {
        NormalizeError::Allocation(format!("{width}x{height} buffer overflows"))
    })?;

    let mut data = Vec::new();
    data.try_reserve_exact(length)
        .map_err(|e| NormalizeError::Allocation(e.to_string()))?;
    // image buffers are already top-left origin, rows go out in order
    for pixel in image.pixels() {
        let [r, g, b] = pixel.0;
        data.extend_from_slice(&[u8::MAX, r, g, b]);
    }

    Ok(NormalizedBuffer {
        width,
        height,
        bytes_per_row,
        data,
        source_id: source.id,
        source_name: source.name.clone(),
    })
}

/// Runs the normalizer off the async executor.
#[derive(Debug, Clone)]
pub struct NormalizerService {
    normalizer: ImageNormalizer,
}

impl NormalizerService {
    pub fn new(normalizer: ImageNormalizer) -> Self {
        Self { normalizer }
    }
}

impl Service<SourceImage> for NormalizerService {
    type Response = NormalizedBuffer;
    type Error = NormalizeError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: SourceImage) -> Self::Future {
        let normalizer = self.normalizer;
        Box::pin(async move {
            tokio::task::spawn_blocking(move || normalizer.normalize(&request))
                .await
                .map_err(|e| NormalizeError::Render(format!("normalization task failed: {e}")))?
        })
    }
}
