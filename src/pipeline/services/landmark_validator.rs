use crate::error::MeasurementError;
use crate::pipeline::domain::{HeightLandmarks, LandmarkSet, LandmarkType, Point};
use tracing::debug;

/// Landmarks a height estimate cannot do without.
pub const REQUIRED_FOR_HEIGHT: [LandmarkType; 3] = [
    LandmarkType::Nose,
    LandmarkType::LeftHeel,
    LandmarkType::RightHeel,
];

/// Presence check run between detection and estimation. Fails closed and never
/// fills in a missing point. A required landmark with a non-finite coordinate
/// counts as missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LandmarkValidator;

impl LandmarkValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, landmarks: &LandmarkSet) -> Result<HeightLandmarks, MeasurementError> {
        if landmarks.is_empty() {
            return Err(MeasurementError::NoPersonDetected);
        }

        let nose = usable_position(landmarks, LandmarkType::Nose);
        let left_heel = usable_position(landmarks, LandmarkType::LeftHeel);
        let right_heel = usable_position(landmarks, LandmarkType::RightHeel);

        match (nose, left_heel, right_heel) {
            (Some(nose), Some(left_heel), Some(right_heel)) => {
                Ok(HeightLandmarks::new(nose, left_heel, right_heel))
            }
            _ => {
                let missing: Vec<LandmarkType> = REQUIRED_FOR_HEIGHT
                    .into_iter()
                    .filter(|kind| usable_position(landmarks, *kind).is_none())
                    .collect();
                debug!(
                    "{} landmarks present, missing {:?}",
                    landmarks.present_count(),
                    missing
                );
                Err(MeasurementError::RequiredLandmarksMissing { missing })
            }
        }
    }
}

fn usable_position(landmarks: &LandmarkSet, kind: LandmarkType) -> Option<Point> {
    landmarks
        .position_of(kind)
        .filter(|position| position.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::domain::Landmark;

    fn full_set() -> LandmarkSet {
        LandmarkSet::new()
            .with(Landmark::present(LandmarkType::Nose, 100.0, 50.0))
            .with(Landmark::present(LandmarkType::LeftHeel, 90.0, 450.0))
            .with(Landmark::present(LandmarkType::RightHeel, 110.0, 470.0))
            .with(Landmark::present(LandmarkType::LeftShoulder, 80.0, 120.0))
    }

    #[test]
    fn empty_set_means_no_person() {
        let result = LandmarkValidator::new().validate(&LandmarkSet::new());
        assert!(matches!(result, Err(MeasurementError::NoPersonDetected)));
    }

    #[test]
    fn narrows_to_required_landmarks() {
        let validated = LandmarkValidator::new().validate(&full_set()).unwrap();
        assert_eq!(validated.nose(), Point::new(100.0, 50.0));
        assert_eq!(validated.left_heel(), Point::new(90.0, 450.0));
        assert_eq!(validated.right_heel(), Point::new(110.0, 470.0));
    }

    #[test]
    fn any_single_missing_landmark_is_reported() {
        for absent in REQUIRED_FOR_HEIGHT {
            let set: LandmarkSet = full_set()
                .iter()
                .copied()
                .filter(|l| l.kind() != absent)
                .collect();

            match LandmarkValidator::new().validate(&set) {
                Err(MeasurementError::RequiredLandmarksMissing { missing }) => {
                    assert_eq!(missing, vec![absent]);
                }
                other => panic!("expected missing {:?}, got {:?}", absent, other),
            }
        }
    }

    #[test]
    fn nose_and_left_heel_only() {
        let set = LandmarkSet::new()
            .with(Landmark::present(LandmarkType::Nose, 100.0, 50.0))
            .with(Landmark::present(LandmarkType::LeftHeel, 90.0, 450.0));

        match LandmarkValidator::new().validate(&set) {
            Err(MeasurementError::RequiredLandmarksMissing { missing }) => {
                assert_eq!(missing, vec![LandmarkType::RightHeel]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn landmark_flagged_absent_counts_as_missing() {
        let set = full_set().with(Landmark::new(
            LandmarkType::RightHeel,
            Point::new(110.0, 470.0),
            false,
        ));

        match LandmarkValidator::new().validate(&set) {
            Err(MeasurementError::RequiredLandmarksMissing { missing }) => {
                assert_eq!(missing, vec![LandmarkType::RightHeel]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn person_without_any_required_landmark() {
        let set = LandmarkSet::new().with(Landmark::present(LandmarkType::LeftHip, 10.0, 10.0));

        match LandmarkValidator::new().validate(&set) {
            Err(MeasurementError::RequiredLandmarksMissing { missing }) => {
                assert_eq!(missing, REQUIRED_FOR_HEIGHT.to_vec());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn non_finite_coordinates_count_as_missing() {
        let set = full_set()
            .with(Landmark::present(LandmarkType::Nose, 100.0, f32::NAN))
            .with(Landmark::present(LandmarkType::RightHeel, 110.0, f32::INFINITY));

        match LandmarkValidator::new().validate(&set) {
            Err(MeasurementError::RequiredLandmarksMissing { missing }) => {
                assert_eq!(missing, vec![LandmarkType::Nose, LandmarkType::RightHeel]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn non_finite_x_is_rejected_too() {
        let set = full_set().with(Landmark::present(
            LandmarkType::LeftHeel,
            f32::NEG_INFINITY,
            450.0,
        ));

        match LandmarkValidator::new().validate(&set) {
            Err(MeasurementError::RequiredLandmarksMissing { missing }) => {
                assert_eq!(missing, vec![LandmarkType::LeftHeel]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
