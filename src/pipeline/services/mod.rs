pub mod image_loader;
pub mod landmark_validator;
pub mod measurement_estimator;
pub mod reporter;

pub use image_loader::ImageLoader;
pub use landmark_validator::{LandmarkValidator, REQUIRED_FOR_HEIGHT};
pub use measurement_estimator::MeasurementEstimator;
pub use reporter::{ConsoleReporter, OutputFormat, ResultReporter, TracingReporter};
