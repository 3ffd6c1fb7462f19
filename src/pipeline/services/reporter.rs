use crate::error::MeasurementError;
use crate::pipeline::domain::MeasurementResult;
use serde::Serialize;
use tracing::{info, warn};

/// Receives the single outcome of a pipeline invocation.
pub trait ResultReporter: Send + Sync {
    fn report(&self, result: &MeasurementResult);
}

/// User-facing message for an outcome, rounded to one decimal for display.
pub fn describe(result: &MeasurementResult) -> String {
    match result {
        Ok(estimate) => format!("Estimated height: {:.1} cm", estimate.centimeters()),
        Err(MeasurementError::FileNotFound { .. }) => "File not found!".to_string(),
        Err(MeasurementError::DecodeFailure { .. }) => "Failed to decode image".to_string(),
        Err(MeasurementError::DetectionFailure(e)) => format!("Detection failed: {}", e),
        Err(MeasurementError::NoPersonDetected) => "No person detected!".to_string(),
        Err(MeasurementError::RequiredLandmarksMissing { .. }) => "Key points missing!".to_string(),
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Report {
    Ok { height_cm: f32 },
    Error { kind: &'static str, message: String },
}

impl From<&MeasurementResult> for Report {
    fn from(result: &MeasurementResult) -> Self {
        match result {
            Ok(estimate) => Report::Ok {
                height_cm: estimate.centimeters(),
            },
            Err(e) => Report::Error {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }
}

/// Logs outcomes through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ResultReporter for TracingReporter {
    fn report(&self, result: &MeasurementResult) {
        match result {
            Ok(estimate) => info!(height_cm = estimate.centimeters(), "{}", describe(result)),
            Err(e) => warn!(kind = e.kind(), error = %e, "{}", describe(result)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Prints outcomes to stdout, as a message line or a JSON document.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    format: OutputFormat,
}

impl ConsoleReporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, result: &MeasurementResult) -> String {
        match self.format {
            OutputFormat::Text => describe(result),
            OutputFormat::Json => serde_json::to_string(&Report::from(result))
                .unwrap_or_else(|e| format!("{{\"status\":\"error\",\"message\":\"{}\"}}", e)),
        }
    }
}

impl ResultReporter for ConsoleReporter {
    fn report(&self, result: &MeasurementResult) {
        println!("{}", self.render(result));
    }
}
