use crate::common::RasterImage;
use crate::error::DetectionError;
use crate::pipeline::domain::LandmarkSet;
use crate::pipeline::orchestration::processing_pipeline::LandmarkDetector;
use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::debug;

type Outcome = Result<LandmarkSet, DetectionError>;

/// Completion handle handed to a callback-style detector.
///
/// `succeed` and `fail` consume the handle, so at most one outcome is ever
/// delivered. Completing after the invocation was abandoned is a no-op.
pub struct DetectionCallback {
    tx: oneshot::Sender<Outcome>,
}

impl DetectionCallback {
    pub fn succeed(self, landmarks: LandmarkSet) {
        self.complete(Ok(landmarks));
    }

    pub fn fail(self, error: DetectionError) {
        self.complete(Err(error));
    }

    /// True once nobody is waiting for the outcome any more.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }

    fn complete(self, outcome: Outcome) {
        if self.tx.send(outcome).is_err() {
            debug!("Detection outcome arrived after the invocation was abandoned, discarding");
        }
    }
}

/// Bridges detectors that report through a listener instead of returning a
/// future. `submit` must hand the callback to something that eventually
/// completes or drops it.
pub struct CallbackDetector<F> {
    name: &'static str,
    submit: F,
}

impl<F> CallbackDetector<F>
where
    F: Fn(RasterImage, DetectionCallback) + Send + Sync + 'static,
{
    pub fn new(name: &'static str, submit: F) -> Self {
        Self { name, submit }
    }
}

#[async_trait]
impl<F> LandmarkDetector for CallbackDetector<F>
where
    F: Fn(RasterImage, DetectionCallback) + Send + Sync + 'static,
{
    async fn detect(&self, image: &RasterImage) -> Result<LandmarkSet, DetectionError> {
        let (tx, rx) = oneshot::channel();
        (self.submit)(image.clone(), DetectionCallback { tx });
        rx.await
            .map_err(|_| DetectionError::new("detector dropped the request without a result"))?
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::domain::{Landmark, LandmarkType};
    use image::{DynamicImage, ImageBuffer, Rgb};
    use std::time::Duration;

    fn raster() -> RasterImage {
        RasterImage::from_image(DynamicImage::ImageRgb8(
            ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(10, 10, Rgb([0, 0, 0])),
        ))
    }

    #[tokio::test]
    async fn listener_on_another_thread_delivers_success() {
        let detector = CallbackDetector::new("threaded", |_image, callback: DetectionCallback| {
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(10));
                callback.succeed(
                    LandmarkSet::new().with(Landmark::present(LandmarkType::Nose, 1.0, 1.0)),
                );
            });
        });

        let landmarks = detector.detect(&raster()).await.unwrap();
        assert!(landmarks.position_of(LandmarkType::Nose).is_some());
    }

    #[tokio::test]
    async fn listener_failure_is_passed_through() {
        let detector = CallbackDetector::new("failing", |_image, callback: DetectionCallback| {
            callback.fail(DetectionError::new("pose model unavailable"));
        });

        let error = detector.detect(&raster()).await.unwrap_err();
        assert_eq!(error.message(), "pose model unavailable");
    }

    #[tokio::test]
    async fn dropped_callback_is_a_detection_failure() {
        let detector = CallbackDetector::new("forgetful", |_image, callback: DetectionCallback| {
            drop(callback);
        });

        let error = detector.detect(&raster()).await.unwrap_err();
        assert_eq!(
            error.message(),
            "detector dropped the request without a result"
        );
    }

    #[test]
    fn completing_an_abandoned_request_is_harmless() {
        let (tx, rx) = oneshot::channel();
        let callback = DetectionCallback { tx };
        drop(rx);

        assert!(callback.is_abandoned());
        callback.succeed(LandmarkSet::new());
    }
}
