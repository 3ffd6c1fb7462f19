pub mod detector_service;

pub use detector_service::DetectorService;
