use std::time::Duration;

/// Stage timings collected during one invocation
#[derive(Debug, Clone, Default)]
pub struct InvocationMetrics {
    load_duration: Option<Duration>,
    detection_duration: Option<Duration>,
    validation_duration: Option<Duration>,
}

impl InvocationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_load_duration(&mut self, duration: Duration) {
        self.load_duration = Some(duration);
    }

    pub fn record_detection_duration(&mut self, duration: Duration) {
        self.detection_duration = Some(duration);
    }

    pub fn record_validation_duration(&mut self, duration: Duration) {
        self.validation_duration = Some(duration);
    }

    pub fn load_duration(&self) -> Option<Duration> {
        self.load_duration
    }

    pub fn detection_duration(&self) -> Option<Duration> {
        self.detection_duration
    }

    pub fn validation_duration(&self) -> Option<Duration> {
        self.validation_duration
    }
}
