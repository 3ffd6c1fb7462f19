use std::sync::Arc;
use std::task::{Context, Poll};

use crate::pipeline::context::{CaptureContext, DetectedState, LoadedState};
use crate::pipeline::orchestration::processing_pipeline::LandmarkDetector;
use futures::future::BoxFuture;
use tower::{BoxError, Service};

/// Exposes a [`LandmarkDetector`] as a tower service so it can sit behind
/// middleware such as a timeout.
#[derive(Clone)]
pub struct DetectorService {
    inner: Arc<dyn LandmarkDetector>,
}

impl DetectorService {
    pub fn new(inner: Arc<dyn LandmarkDetector>) -> Self {
        Self { inner }
    }
}

impl Service<CaptureContext<LoadedState>> for DetectorService {
    type Response = CaptureContext<DetectedState>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: CaptureContext<LoadedState>) -> Self::Future {
        let inner = self.inner.clone();

        Box::pin(async move {
            tracing::debug!(detector = inner.name(), "Running landmark detection");
            let landmarks = inner.detect(req.raster()).await?;
            Ok(req.into_detected(landmarks))
        })
    }
}
