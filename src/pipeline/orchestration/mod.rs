pub mod processing_pipeline;
pub mod service;
pub mod step;

pub use processing_pipeline::{LandmarkDetector, MeasurementPipeline, MeasurementPipelineBuilder};
pub use service::DetectorService;
pub use step::{
    BlockingDetector, CallbackDetector, DetectionCallback, LandmarkExport, LandmarkExportDetector,
};
