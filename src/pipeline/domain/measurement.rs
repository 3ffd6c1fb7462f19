use crate::error::MeasurementError;
use crate::pipeline::domain::landmark::Point;

/// Landmarks needed for a height estimate, all known to be present.
///
/// Only the landmark validator builds this, so the estimator never sees a
/// partial set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightLandmarks {
    nose: Point,
    left_heel: Point,
    right_heel: Point,
}

impl HeightLandmarks {
    pub(crate) fn new(nose: Point, left_heel: Point, right_heel: Point) -> Self {
        Self {
            nose,
            left_heel,
            right_heel,
        }
    }

    pub fn nose(&self) -> Point {
        self.nose
    }

    pub fn left_heel(&self) -> Point {
        self.left_heel
    }

    pub fn right_heel(&self) -> Point {
        self.right_heel
    }
}

/// Estimated standing height in centimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightEstimate {
    centimeters: f32,
}

impl HeightEstimate {
    pub fn new(centimeters: f32) -> Self {
        Self { centimeters }
    }

    pub fn centimeters(&self) -> f32 {
        self.centimeters
    }
}

/// Outcome of one pipeline invocation.
pub type MeasurementResult = Result<HeightEstimate, MeasurementError>;
