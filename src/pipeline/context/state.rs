use crate::common::RasterImage;
use crate::pipeline::domain::{HeightLandmarks, LandmarkSet};

// Markers to track the state of one measurement invocation
pub struct IngestedState;
pub struct LoadedState {
    pub(super) raster: RasterImage,
}
pub struct DetectedState {
    pub(super) landmarks: LandmarkSet,
}
pub struct ValidatedState {
    pub(super) landmarks: HeightLandmarks,
}

pub trait ProcessingState: 'static {
    fn state_name() -> &'static str;
}

impl ProcessingState for IngestedState {
    fn state_name() -> &'static str {
        "Ingested"
    }
}

impl ProcessingState for LoadedState {
    fn state_name() -> &'static str {
        "Loaded"
    }
}

impl ProcessingState for DetectedState {
    fn state_name() -> &'static str {
        "Detected"
    }
}

impl ProcessingState for ValidatedState {
    fn state_name() -> &'static str {
        "Validated"
    }
}
