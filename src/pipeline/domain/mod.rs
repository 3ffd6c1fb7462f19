pub mod landmark;
pub mod measurement;

pub use landmark::{Landmark, LandmarkSet, LandmarkType, Point};
pub use measurement::{HeightEstimate, HeightLandmarks, MeasurementResult};
