use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Body landmarks reported by the pose model, in model index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LandmarkType {
    Nose,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    LeftMouth,
    RightMouth,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

impl LandmarkType {
    pub const ALL: [LandmarkType; 33] = [
        LandmarkType::Nose,
        LandmarkType::LeftEyeInner,
        LandmarkType::LeftEye,
        LandmarkType::LeftEyeOuter,
        LandmarkType::RightEyeInner,
        LandmarkType::RightEye,
        LandmarkType::RightEyeOuter,
        LandmarkType::LeftEar,
        LandmarkType::RightEar,
        LandmarkType::LeftMouth,
        LandmarkType::RightMouth,
        LandmarkType::LeftShoulder,
        LandmarkType::RightShoulder,
        LandmarkType::LeftElbow,
        LandmarkType::RightElbow,
        LandmarkType::LeftWrist,
        LandmarkType::RightWrist,
        LandmarkType::LeftPinky,
        LandmarkType::RightPinky,
        LandmarkType::LeftIndex,
        LandmarkType::RightIndex,
        LandmarkType::LeftThumb,
        LandmarkType::RightThumb,
        LandmarkType::LeftHip,
        LandmarkType::RightHip,
        LandmarkType::LeftKnee,
        LandmarkType::RightKnee,
        LandmarkType::LeftAnkle,
        LandmarkType::RightAnkle,
        LandmarkType::LeftHeel,
        LandmarkType::RightHeel,
        LandmarkType::LeftFootIndex,
        LandmarkType::RightFootIndex,
    ];

    /// Index of the landmark in the pose model output.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// A 2D point in raster pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scaled(self, sx: f32, sy: f32) -> Self {
        Self {
            x: self.x * sx,
            y: self.y * sy,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    kind: LandmarkType,
    position: Point,
    present: bool,
}

impl Landmark {
    pub fn new(kind: LandmarkType, position: Point, present: bool) -> Self {
        Self {
            kind,
            position,
            present,
        }
    }

    pub fn present(kind: LandmarkType, x: f32, y: f32) -> Self {
        Self::new(kind, Point::new(x, y), true)
    }

    pub fn kind(&self) -> LandmarkType {
        self.kind
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_present(&self) -> bool {
        self.present
    }
}

/// Landmarks of the primary detected person, keyed by type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSet {
    landmarks: IndexMap<LandmarkType, Landmark>,
}

impl LandmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a landmark, replacing any earlier landmark of the same type.
    pub fn insert(&mut self, landmark: Landmark) -> Option<Landmark> {
        self.landmarks.insert(landmark.kind(), landmark)
    }

    pub fn with(mut self, landmark: Landmark) -> Self {
        self.insert(landmark);
        self
    }

    pub fn get(&self, kind: LandmarkType) -> Option<&Landmark> {
        self.landmarks.get(&kind)
    }

    /// Position of `kind` if the detector reported it as present.
    pub fn position_of(&self, kind: LandmarkType) -> Option<Point> {
        self.get(kind)
            .filter(|landmark| landmark.is_present())
            .map(Landmark::position)
    }

    pub fn present_count(&self) -> usize {
        self.landmarks.values().filter(|l| l.is_present()).count()
    }

    /// True when no landmark is present, i.e. nobody was found in the frame.
    pub fn is_empty(&self) -> bool {
        self.present_count() == 0
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.landmarks.values()
    }
}

impl FromIterator<Landmark> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = Landmark>>(iter: I) -> Self {
        let mut set = LandmarkSet::new();
        for landmark in iter {
            set.insert(landmark);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_model_order() {
        assert_eq!(LandmarkType::Nose.index(), 0);
        assert_eq!(LandmarkType::LeftHeel.index(), 29);
        assert_eq!(LandmarkType::RightHeel.index(), 30);
        assert_eq!(LandmarkType::from_index(32), Some(LandmarkType::RightFootIndex));
        assert_eq!(LandmarkType::from_index(33), None);
        for (i, kind) in LandmarkType::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn serialized_names_are_screaming_snake_case() {
        let json = serde_json::to_string(&LandmarkType::LeftFootIndex).unwrap();
        assert_eq!(json, "\"LEFT_FOOT_INDEX\"");
        let kind: LandmarkType = serde_json::from_str("\"RIGHT_HEEL\"").unwrap();
        assert_eq!(kind, LandmarkType::RightHeel);
    }

    #[test]
    fn absent_landmarks_do_not_count_as_present() {
        let set = LandmarkSet::new()
            .with(Landmark::new(LandmarkType::Nose, Point::new(1.0, 2.0), false))
            .with(Landmark::new(LandmarkType::LeftHeel, Point::new(3.0, 4.0), false));
        assert_eq!(set.len(), 2);
        assert!(set.is_empty());
        assert_eq!(set.position_of(LandmarkType::Nose), None);
    }

    #[test]
    fn later_insert_replaces_earlier() {
        let set: LandmarkSet = vec![
            Landmark::present(LandmarkType::Nose, 1.0, 1.0),
            Landmark::present(LandmarkType::Nose, 5.0, 6.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 1);
        assert_eq!(set.position_of(LandmarkType::Nose), Some(Point::new(5.0, 6.0)));
    }
}
