use crate::common::RasterImage;
use crate::error::DetectionError;
use crate::pipeline::domain::LandmarkSet;
use crate::pipeline::orchestration::processing_pipeline::LandmarkDetector;
use async_trait::async_trait;
use std::sync::Arc;

/// Runs a synchronous detection function on the blocking pool so the caller
/// is not parked while the model runs.
pub struct BlockingDetector<F> {
    name: &'static str,
    detect: Arc<F>,
}

impl<F> BlockingDetector<F>
where
    F: Fn(&RasterImage) -> Result<LandmarkSet, DetectionError> + Send + Sync + 'static,
{
    pub fn new(name: &'static str, detect: F) -> Self {
        Self {
            name,
            detect: Arc::new(detect),
        }
    }
}

#[async_trait]
impl<F> LandmarkDetector for BlockingDetector<F>
where
    F: Fn(&RasterImage) -> Result<LandmarkSet, DetectionError> + Send + Sync + 'static,
{
    async fn detect(&self, image: &RasterImage) -> Result<LandmarkSet, DetectionError> {
        let detect = self.detect.clone();
        let image = image.clone();
        tokio::task::spawn_blocking(move || detect(&image))
            .await
            .map_err(|e| DetectionError::with_source("blocking detector task failed", e))?
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
