use crate::config::CalibrationConfig;
use crate::pipeline::domain::{HeightEstimate, HeightLandmarks};

/// Converts the nose-to-heel pixel span into centimeters.
///
/// Assumes an upright subject facing the camera, fully in frame, at the
/// distance the calibration factor was chosen for. Nothing here checks that
/// the result is physically plausible.
#[derive(Debug, Clone, Copy)]
pub struct MeasurementEstimator {
    calibration: CalibrationConfig,
}

impl MeasurementEstimator {
    pub fn new(calibration: CalibrationConfig) -> Self {
        Self { calibration }
    }

    pub fn calibration(&self) -> CalibrationConfig {
        self.calibration
    }

    /// Vertical distance in pixels from the nose down to the mean heel height.
    pub fn pixel_span(landmarks: &HeightLandmarks) -> f32 {
        let average_heel_y = (landmarks.left_heel().y + landmarks.right_heel().y) / 2.0;
        average_heel_y - landmarks.nose().y
    }

    pub fn estimate(&self, landmarks: &HeightLandmarks) -> HeightEstimate {
        HeightEstimate::new(Self::pixel_span(landmarks) * self.calibration.pixels_to_cm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::domain::Point;

    fn landmarks(nose_y: f32, left_heel_y: f32, right_heel_y: f32) -> HeightLandmarks {
        HeightLandmarks::new(
            Point::new(100.0, nose_y),
            Point::new(90.0, left_heel_y),
            Point::new(110.0, right_heel_y),
        )
    }

    fn estimator(factor: f32) -> MeasurementEstimator {
        MeasurementEstimator::new(CalibrationConfig::new(factor).unwrap())
    }

    #[test]
    fn reference_scenario() {
        let points = landmarks(50.0, 450.0, 470.0);
        assert_eq!(MeasurementEstimator::pixel_span(&points), 410.0);

        let estimate = estimator(0.1).estimate(&points);
        assert!((estimate.centimeters() - 41.0).abs() < 1e-4);
    }

    #[test]
    fn repeated_calls_agree() {
        let points = landmarks(37.5, 912.25, 903.75);
        let estimator = estimator(0.137);
        let first = estimator.estimate(&points);
        for _ in 0..10 {
            assert_eq!(estimator.estimate(&points), first);
        }
    }

    #[test]
    fn doubling_calibration_doubles_estimate() {
        let points = landmarks(61.0, 733.0, 741.0);
        for factor in [0.1, 0.173, 2.5] {
            let single = estimator(factor).estimate(&points).centimeters();
            let double = estimator(factor * 2.0).estimate(&points).centimeters();
            assert_eq!(double, single * 2.0);
        }
    }

    #[test]
    fn x_coordinates_do_not_matter() {
        let a = HeightLandmarks::new(
            Point::new(0.0, 10.0),
            Point::new(0.0, 110.0),
            Point::new(0.0, 130.0),
        );
        let b = HeightLandmarks::new(
            Point::new(500.0, 10.0),
            Point::new(-40.0, 110.0),
            Point::new(999.0, 130.0),
        );
        assert_eq!(estimator(0.1).estimate(&a), estimator(0.1).estimate(&b));
    }

    #[test]
    fn inverted_pose_gives_negative_estimate() {
        // Heels above the nose, e.g. a rotated photograph. Not rejected.
        let estimate = estimator(0.5).estimate(&landmarks(400.0, 100.0, 100.0));
        assert_eq!(estimate.centimeters(), -150.0);
    }
}
