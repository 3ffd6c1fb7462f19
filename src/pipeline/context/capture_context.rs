use crate::common::RasterImage;
use crate::pipeline::context::metrics::InvocationMetrics;
use crate::pipeline::context::state::{
    DetectedState, IngestedState, LoadedState, ProcessingState, ValidatedState,
};
use crate::pipeline::domain::{HeightLandmarks, LandmarkSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use uuid::Uuid;

// CaptureContext with compile-time state tracking via the state parameter
pub struct CaptureContext<S> {
    path: PathBuf,
    invocation_id: Uuid,
    metrics: InvocationMetrics,
    processing_start: Instant,
    stage_start: Instant,
    state: S,
}

impl<S: ProcessingState> CaptureContext<S> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn invocation_id(&self) -> Uuid {
        self.invocation_id
    }

    pub fn metrics(&self) -> &InvocationMetrics {
        &self.metrics
    }

    pub fn elapsed(&self) -> Duration {
        self.processing_start.elapsed()
    }

    pub fn state_name(&self) -> &'static str {
        S::state_name()
    }

    fn advance<T>(self, state: T) -> CaptureContext<T> {
        CaptureContext {
            path: self.path,
            invocation_id: self.invocation_id,
            metrics: self.metrics,
            processing_start: self.processing_start,
            stage_start: Instant::now(),
            state,
        }
    }
}

impl CaptureContext<IngestedState> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let now = Instant::now();
        Self {
            path: path.into(),
            invocation_id: Uuid::new_v4(),
            metrics: InvocationMetrics::new(),
            processing_start: now,
            stage_start: now,
            state: IngestedState,
        }
    }

    pub fn into_loaded(mut self, raster: RasterImage) -> CaptureContext<LoadedState> {
        self.metrics.record_load_duration(self.stage_start.elapsed());
        self.advance(LoadedState { raster })
    }
}

impl CaptureContext<LoadedState> {
    pub fn raster(&self) -> &RasterImage {
        &self.state.raster
    }

    /// Drops the raster; nothing after detection needs pixels.
    pub fn into_detected(mut self, landmarks: LandmarkSet) -> CaptureContext<DetectedState> {
        self.metrics.record_detection_duration(self.stage_start.elapsed());
        self.advance(DetectedState { landmarks })
    }
}

impl CaptureContext<DetectedState> {
    pub fn landmarks(&self) -> &LandmarkSet {
        &self.state.landmarks
    }

    pub fn into_validated(mut self, landmarks: HeightLandmarks) -> CaptureContext<ValidatedState> {
        self.metrics.record_validation_duration(self.stage_start.elapsed());
        self.advance(ValidatedState { landmarks })
    }
}

impl CaptureContext<ValidatedState> {
    pub fn landmarks(&self) -> &HeightLandmarks {
        &self.state.landmarks
    }
}
