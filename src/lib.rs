//! Standing-height estimation from a single photograph.
//!
//! An image is decoded and downsampled, handed to a pose/landmark detector,
//! checked for the nose and both heels, and the nose-to-heel pixel span is
//! scaled by a calibration factor into centimeters.

pub mod common;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod pipeline;

pub use common::RasterImage;
pub use config::{CalibrationConfig, Configuration};
pub use coordinator::MeasurementHandle;
pub use error::{AppError, DetectionError, MeasurementError};
pub use pipeline::orchestration::{
    BlockingDetector, CallbackDetector, DetectionCallback, LandmarkExportDetector,
};
pub use pipeline::services::{
    ConsoleReporter, ImageLoader, LandmarkValidator, MeasurementEstimator, OutputFormat,
    ResultReporter, TracingReporter,
};
pub use pipeline::{
    HeightEstimate, HeightLandmarks, Landmark, LandmarkDetector, LandmarkSet, LandmarkType,
    MeasurementPipeline, MeasurementResult, Point,
};
