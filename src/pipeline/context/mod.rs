pub mod capture_context;
pub mod metrics;
pub mod state;

pub use capture_context::CaptureContext;
pub use metrics::InvocationMetrics;
pub use state::{DetectedState, IngestedState, LoadedState, ProcessingState, ValidatedState};
