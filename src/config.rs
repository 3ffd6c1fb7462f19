use crate::error::AppError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const ENV_PREFIX: &str = "ATTRIBUTE_ESTIMATOR";

/// Placeholder pixels-to-centimeters factor. It assumes a fixed subject
/// distance and has not been derived from any camera model.
pub const DEFAULT_PIXELS_TO_CM: f32 = 0.1;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub calibration: CalibrationConfig,
    pub loader: LoaderConfig,
    pub detector: DetectorConfig,
    pub log_level: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            calibration: CalibrationConfig::default(),
            loader: LoaderConfig::default(),
            detector: DetectorConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Configuration {
    /// Layers defaults, an optional config file and `ATTRIBUTE_ESTIMATOR_*`
    /// environment variables (`__` separates nested keys).
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let configuration: Configuration = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        configuration
            .validate()
            .map_err(AppError::InvalidConfiguration)?;
        Ok(configuration)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        self.loader.validate()?;

        if self.detector.timeout_ms == Some(0) {
            return Err("Detector timeout must be greater than 0".to_string());
        }

        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(format!("Unknown log level '{}'", self.log_level));
        }

        Ok(())
    }

    // Overrides the calibration factor from the file/environment.
    pub fn with_calibration(mut self, calibration: CalibrationConfig) -> Self {
        self.calibration = calibration;
        self
    }

    // Overrides the loader sample size from the file/environment.
    pub fn with_sample_size(mut self, sample_size: u32) -> Self {
        self.loader.sample_size = sample_size;
        self
    }

    pub fn with_log_level(mut self, log_level: impl Into<String>) -> Self {
        self.log_level = log_level.into();
        self
    }
}

/// Pixels-to-centimeters conversion factor, always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawCalibration")]
pub struct CalibrationConfig {
    pixels_to_cm: f32,
}

impl CalibrationConfig {
    pub fn new(pixels_to_cm: f32) -> Result<Self, AppError> {
        if !pixels_to_cm.is_finite() || pixels_to_cm <= 0.0 {
            return Err(AppError::InvalidConfiguration(format!(
                "Calibration factor must be a finite positive number, got {}",
                pixels_to_cm
            )));
        }
        Ok(Self { pixels_to_cm })
    }

    pub fn pixels_to_cm(&self) -> f32 {
        self.pixels_to_cm
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            pixels_to_cm: DEFAULT_PIXELS_TO_CM,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct RawCalibration {
    pixels_to_cm: f32,
}

impl Default for RawCalibration {
    fn default() -> Self {
        Self {
            pixels_to_cm: DEFAULT_PIXELS_TO_CM,
        }
    }
}

impl TryFrom<RawCalibration> for CalibrationConfig {
    type Error = String;

    fn try_from(raw: RawCalibration) -> Result<Self, Self::Error> {
        CalibrationConfig::new(raw.pixels_to_cm).map_err(|e| e.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Integer reduction applied to each axis while loading. 1 keeps full size.
    pub sample_size: u32,
    /// Upper bound on decoder allocations. `None` removes the cap entirely.
    pub max_decode_bytes: Option<u64>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            sample_size: 2,
            max_decode_bytes: Some(512 * 1024 * 1024),
        }
    }
}

impl LoaderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_size == 0 {
            return Err("Sample size must be greater than 0".to_string());
        }

        if self.max_decode_bytes == Some(0) {
            return Err("Decode allocation limit must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub timeout_ms: Option<u64>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: Some(30_000),
        }
    }
}

impl DetectorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
