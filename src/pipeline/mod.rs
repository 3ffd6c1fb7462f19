pub mod context;
pub mod domain;
pub mod orchestration;
pub mod services;

pub use domain::{
    HeightEstimate, HeightLandmarks, Landmark, LandmarkSet, LandmarkType, MeasurementResult, Point,
};
pub use orchestration::{LandmarkDetector, MeasurementPipeline, MeasurementPipelineBuilder};
