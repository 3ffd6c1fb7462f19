use crate::pipeline::domain::landmark::LandmarkType;
use std::path::PathBuf;
use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Pipeline Error: {0}")]
    Pipeline(String),
    #[error("Measurement Error: {0}")]
    Measurement(#[from] MeasurementError),
}

// Terminal failures of a single pipeline invocation

#[derive(Error, Debug)]
pub enum MeasurementError {
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },
    #[error("Failed to decode {}: {reason}", path.display())]
    DecodeFailure { path: PathBuf, reason: String },
    #[error("Detection failed: {0}")]
    DetectionFailure(#[from] DetectionError),
    #[error("No person detected")]
    NoPersonDetected,
    #[error("Required landmarks missing: {missing:?}")]
    RequiredLandmarksMissing { missing: Vec<LandmarkType> },
}

impl MeasurementError {
    /// Stable machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            MeasurementError::FileNotFound { .. } => "file_not_found",
            MeasurementError::DecodeFailure { .. } => "decode_failure",
            MeasurementError::DetectionFailure(_) => "detection_failure",
            MeasurementError::NoPersonDetected => "no_person_detected",
            MeasurementError::RequiredLandmarksMissing { .. } => "required_landmarks_missing",
        }
    }
}

// Opaque detector failure, carries the underlying cause when there is one

#[derive(Error, Debug)]
#[error("{message}")]
pub struct DetectionError {
    message: String,
    #[source]
    source: Option<tower::BoxError>,
}

impl DetectionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<tower::BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn detection_error_keeps_its_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "model crashed");
        let err = DetectionError::with_source("pose service unavailable", io);
        assert_eq!(err.to_string(), "pose service unavailable");
        assert_eq!(err.source().unwrap().to_string(), "model crashed");
    }

    #[test]
    fn measurement_error_kinds_are_distinct() {
        let kinds = [
            MeasurementError::FileNotFound { path: "a.jpg".into() }.kind(),
            MeasurementError::DecodeFailure {
                path: "a.jpg".into(),
                reason: "empty".into(),
            }
            .kind(),
            MeasurementError::DetectionFailure(DetectionError::new("x")).kind(),
            MeasurementError::NoPersonDetected.kind(),
            MeasurementError::RequiredLandmarksMissing { missing: vec![] }.kind(),
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
