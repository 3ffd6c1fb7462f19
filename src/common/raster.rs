use chrono::{DateTime, Utc};
use image::DynamicImage;
use std::sync::Arc;
use uuid::Uuid;

/// A decoded, possibly downsampled photograph owned by one pipeline invocation.
#[derive(Clone)]
pub struct RasterImage {
    image: Arc<DynamicImage>,
    source_dimensions: (u32, u32),
    sample_size: u32,
    loaded_at: DateTime<Utc>,
    invocation_id: Uuid,
}

impl RasterImage {
    pub fn new(image: DynamicImage, source_dimensions: (u32, u32), sample_size: u32) -> Self {
        Self {
            image: Arc::new(image),
            source_dimensions,
            sample_size,
            loaded_at: Utc::now(),
            invocation_id: Uuid::new_v4(),
        }
    }

    /// Wraps an in-memory image that was not downsampled.
    pub fn from_image(image: DynamicImage) -> Self {
        let dimensions = (image.width(), image.height());
        Self::new(image, dimensions, 1)
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Dimensions of the file before downsampling.
    pub fn source_dimensions(&self) -> (u32, u32) {
        self.source_dimensions
    }

    pub fn sample_size(&self) -> u32 {
        self.sample_size
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn invocation_id(&self) -> Uuid {
        self.invocation_id
    }
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("dimensions", &self.dimensions())
            .field("source_dimensions", &self.source_dimensions)
            .field("sample_size", &self.sample_size)
            .field("invocation_id", &self.invocation_id)
            .finish()
    }
}
