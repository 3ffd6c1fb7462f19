use crate::common::RasterImage;
use crate::error::DetectionError;
use crate::pipeline::domain::{Landmark, LandmarkSet, LandmarkType, Point};
use crate::pipeline::orchestration::processing_pipeline::LandmarkDetector;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Pose landmarks exported by an external pose service.
#[derive(Debug, Clone, Deserialize)]
pub struct LandmarkExport {
    /// Dimensions of the image the coordinates refer to. When absent the
    /// coordinates are taken to be in raster space already.
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    #[serde(default)]
    pub poses: Vec<ExportedPose>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportedPose {
    #[serde(default)]
    pub landmarks: Vec<ExportedLandmark>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportedLandmark {
    #[serde(rename = "type")]
    pub kind: LandmarkType,
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_present")]
    pub present: bool,
}

fn default_present() -> bool {
    true
}

impl LandmarkExport {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DetectionError> {
        serde_json::from_slice(bytes)
            .map_err(|e| DetectionError::with_source("malformed landmark export", e))
    }

    /// Landmarks of the first pose, mapped into the raster's coordinate space.
    pub fn primary_landmarks(&self, raster: &RasterImage) -> Result<LandmarkSet, DetectionError> {
        let Some(primary) = self.poses.first() else {
            return Ok(LandmarkSet::new());
        };
        if self.poses.len() > 1 {
            debug!("Ignoring {} additional poses", self.poses.len() - 1);
        }

        let (sx, sy) = match (self.image_width, self.image_height) {
            (Some(0), _) | (_, Some(0)) => {
                return Err(DetectionError::new(
                    "landmark export declares a zero image dimension",
                ));
            }
            (Some(width), Some(height)) => (
                raster.width() as f32 / width as f32,
                raster.height() as f32 / height as f32,
            ),
            _ => (1.0, 1.0),
        };

        Ok(primary
            .landmarks
            .iter()
            .map(|l| Landmark::new(l.kind, Point::new(l.x, l.y).scaled(sx, sy), l.present))
            .collect())
    }
}

/// Detector backed by a landmark export file written next to the capture.
#[derive(Debug, Clone)]
pub struct LandmarkExportDetector {
    path: PathBuf,
}

impl LandmarkExportDetector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `capture.jpg` -> `capture.landmarks.json`
    pub fn sidecar_for(image_path: &Path) -> PathBuf {
        image_path.with_extension("landmarks.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LandmarkDetector for LandmarkExportDetector {
    async fn detect(&self, image: &RasterImage) -> Result<LandmarkSet, DetectionError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            DetectionError::with_source(
                format!("cannot read landmark export {}", self.path.display()),
                e,
            )
        })?;
        let export = LandmarkExport::from_slice(&bytes)?;
        export.primary_landmarks(image)
    }

    fn name(&self) -> &'static str {
        "LandmarkExportDetector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, Rgb};

    fn raster(width: u32, height: u32) -> RasterImage {
        RasterImage::from_image(DynamicImage::ImageRgb8(
            ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(width, height, Rgb([0, 0, 0])),
        ))
    }

    #[test]
    fn uses_first_pose_only() {
        let export = LandmarkExport::from_slice(
            br#"{ "poses": [
                { "landmarks": [ { "type": "NOSE", "x": 10.0, "y": 20.0 } ] },
                { "landmarks": [ { "type": "LEFT_HEEL", "x": 1.0, "y": 2.0 } ] }
            ] }"#,
        )
        .unwrap();

        let set = export.primary_landmarks(&raster(100, 100)).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.position_of(LandmarkType::Nose), Some(Point::new(10.0, 20.0)));
        assert!(set.get(LandmarkType::LeftHeel).is_none());
    }

    #[test]
    fn rescales_into_raster_space() {
        let export = LandmarkExport::from_slice(
            br#"{ "image_width": 200, "image_height": 400, "poses": [
                { "landmarks": [ { "type": "RIGHT_HEEL", "x": 100.0, "y": 300.0 } ] }
            ] }"#,
        )
        .unwrap();

        let set = export.primary_landmarks(&raster(100, 200)).unwrap();
        assert_eq!(
            set.position_of(LandmarkType::RightHeel),
            Some(Point::new(50.0, 150.0))
        );
    }

    #[test]
    fn no_poses_is_an_empty_set() {
        let export = LandmarkExport::from_slice(br#"{ "poses": [] }"#).unwrap();
        assert!(export.primary_landmarks(&raster(10, 10)).unwrap().is_empty());

        let export = LandmarkExport::from_slice(b"{}").unwrap();
        assert!(export.primary_landmarks(&raster(10, 10)).unwrap().is_empty());
    }

    #[test]
    fn present_flag_is_honoured() {
        let export = LandmarkExport::from_slice(
            br#"{ "poses": [ { "landmarks": [
                { "type": "NOSE", "x": 1.0, "y": 1.0, "present": false }
            ] } ] }"#,
        )
        .unwrap();

        let set = export.primary_landmarks(&raster(10, 10)).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.is_empty());
    }

    #[test]
    fn malformed_export_is_rejected() {
        assert!(LandmarkExport::from_slice(b"{ \"poses\": [ { \"landmarks\": 3 } ] }").is_err());
        assert!(LandmarkExport::from_slice(br#"{ "poses": [ { "landmarks": [
            { "type": "TAIL", "x": 1.0, "y": 1.0 } ] } ] }"#)
        .is_err());
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let export = LandmarkExport::from_slice(
            br#"{ "image_width": 0, "image_height": 10, "poses": [ { "landmarks": [] } ] }"#,
        )
        .unwrap();
        assert!(export.primary_landmarks(&raster(10, 10)).is_err());
    }

    #[test]
    fn sidecar_path_replaces_extension() {
        assert_eq!(
            LandmarkExportDetector::sidecar_for(Path::new("/tmp/JPEG_20240101_120000_.jpg")),
            PathBuf::from("/tmp/JPEG_20240101_120000_.landmarks.json")
        );
    }

    #[tokio::test]
    async fn unreadable_export_is_a_detection_error() {
        let dir = tempfile::tempdir().unwrap();
        let detector = LandmarkExportDetector::new(dir.path().join("missing.json"));
        assert!(detector.detect(&raster(10, 10)).await.is_err());
    }
}
