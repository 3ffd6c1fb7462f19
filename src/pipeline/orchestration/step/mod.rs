pub mod blocking_detector;
pub mod callback_detector;
pub mod landmark_export;

pub use blocking_detector::BlockingDetector;
pub use callback_detector::{CallbackDetector, DetectionCallback};
pub use landmark_export::{LandmarkExport, LandmarkExportDetector};
