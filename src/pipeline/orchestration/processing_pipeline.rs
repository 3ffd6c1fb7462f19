use crate::common::RasterImage;
use crate::config::Configuration;
use crate::coordinator::MeasurementHandle;
use crate::error::{AppError, DetectionError, MeasurementError};
use crate::pipeline::context::{CaptureContext, DetectedState, LoadedState};
use crate::pipeline::domain::{LandmarkSet, MeasurementResult};
use crate::pipeline::orchestration::service::DetectorService;
use crate::pipeline::services::{
    ImageLoader, LandmarkValidator, MeasurementEstimator, ResultReporter, TracingReporter,
};
use async_trait::async_trait;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower::timeout::error::Elapsed;
use tower::timeout::TimeoutLayer;
use tower::util::BoxCloneService;
use tower::{BoxError, ServiceBuilder, ServiceExt};
use tracing::{debug, info, info_span, Instrument};

/// Pose/landmark detection capability consumed by the pipeline.
///
/// One call per raster, one terminal outcome per call. Implementations may
/// complete on any thread; see the adapters in `step` for blocking and
/// callback-style detectors.
#[async_trait]
pub trait LandmarkDetector: Send + Sync {
    async fn detect(&self, image: &RasterImage) -> Result<LandmarkSet, DetectionError>;
    fn name(&self) -> &'static str;
}

type DetectorStep =
    BoxCloneService<CaptureContext<LoadedState>, CaptureContext<DetectedState>, BoxError>;

/// Load -> detect -> validate -> estimate for a single captured image.
#[derive(Clone)]
pub struct MeasurementPipeline {
    loader: ImageLoader,
    detector: DetectorStep,
    detector_timeout: Option<Duration>,
    validator: LandmarkValidator,
    estimator: MeasurementEstimator,
    reporter: Arc<dyn ResultReporter>,
}

impl MeasurementPipeline {
    pub fn builder(configuration: Configuration) -> MeasurementPipelineBuilder {
        MeasurementPipelineBuilder::new(configuration)
    }

    /// Runs one invocation. The returned future owns everything it needs, so
    /// it can be spawned or dropped at any point.
    pub fn measure(
        &self,
        path: impl Into<PathBuf>,
    ) -> impl Future<Output = MeasurementResult> + Send + 'static {
        let path = path.into();
        let loader = self.loader.clone();
        let detector = self.detector.clone();
        let detector_timeout = self.detector_timeout;
        let validator = self.validator;
        let estimator = self.estimator;
        let span = info_span!("measure", path = %path.display());

        async move {
            info!("Starting measurement");
            let context = CaptureContext::new(path.clone());
            let raster = loader.load_async(path).await?;
            let context = context.into_loaded(raster);
            debug!(
                invocation = %context.invocation_id(),
                dimensions = ?context.raster().dimensions(),
                "Submitting raster to detector"
            );

            let context = detector
                .oneshot(context)
                .await
                .map_err(|e| detection_failure(e, detector_timeout))?;
            debug!(
                present = context.landmarks().present_count(),
                "Detector returned landmarks"
            );

            let landmarks = validator.validate(context.landmarks())?;
            let context = context.into_validated(landmarks);
            let estimate = estimator.estimate(context.landmarks());

            debug!(
                metrics = ?context.metrics(),
                elapsed_us = context.elapsed().as_micros() as u64,
                "Measurement complete"
            );
            Ok(estimate)
        }
        .instrument(span)
    }

    /// Runs one invocation on a tokio task. The reporter receives the outcome
    /// unless the returned handle is cancelled or dropped first.
    pub fn spawn(&self, path: impl Into<PathBuf>) -> MeasurementHandle {
        MeasurementHandle::spawn(self.measure(path), self.reporter.clone())
    }

    pub fn reporter(&self) -> &Arc<dyn ResultReporter> {
        &self.reporter
    }
}

fn detection_failure(error: BoxError, timeout: Option<Duration>) -> MeasurementError {
    let error = match error.downcast::<DetectionError>() {
        Ok(error) => *error,
        Err(error) if error.is::<Elapsed>() => {
            let budget = timeout.map(|t| t.as_millis()).unwrap_or_default();
            DetectionError::with_source(format!("no result within {} ms", budget), error)
        }
        Err(error) => DetectionError::with_source("detector service failed", error),
    };
    MeasurementError::DetectionFailure(error)
}

pub struct MeasurementPipelineBuilder {
    configuration: Configuration,
    detector: Option<Arc<dyn LandmarkDetector>>,
    reporter: Option<Arc<dyn ResultReporter>>,
}

impl MeasurementPipelineBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            detector: None,
            reporter: None,
        }
    }

    pub fn detector(mut self, detector: impl LandmarkDetector + 'static) -> Self {
        self.detector = Some(Arc::new(detector));
        self
    }

    pub fn shared_detector(mut self, detector: Arc<dyn LandmarkDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn reporter(mut self, reporter: impl ResultReporter + 'static) -> Self {
        self.reporter = Some(Arc::new(reporter));
        self
    }

    pub fn shared_reporter(mut self, reporter: Arc<dyn ResultReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    // Sets the detector timeout, this will override the configuration.
    pub fn detector_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.configuration.detector.timeout_ms = timeout.map(|t| t.as_millis() as u64);
        self
    }

    pub fn build(self) -> Result<MeasurementPipeline, AppError> {
        self.configuration
            .validate()
            .map_err(AppError::InvalidConfiguration)?;
        let detector = self
            .detector
            .ok_or(AppError::Pipeline("Detector not set".to_string()))?;
        let reporter = self
            .reporter
            .unwrap_or_else(|| Arc::new(TracingReporter));

        let detector_timeout = self.configuration.detector.timeout();
        let detector_step = ServiceBuilder::new()
            .option_layer(detector_timeout.map(TimeoutLayer::new))
            .service(DetectorService::new(detector));

        Ok(MeasurementPipeline {
            loader: ImageLoader::new(&self.configuration.loader),
            detector: BoxCloneService::new(detector_step),
            detector_timeout,
            validator: LandmarkValidator::new(),
            estimator: MeasurementEstimator::new(self.configuration.calibration),
            reporter,
        })
    }
}
