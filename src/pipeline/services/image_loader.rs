use crate::common::RasterImage;
use crate::config::LoaderConfig;
use crate::error::MeasurementError;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat, ImageReader, Limits, RgbImage};
use jpeg_decoder::PixelFormat;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Decodes a captured photograph into a downsampled raster.
///
/// JPEG captures are decoded directly at reduced resolution, so the full-size
/// image is never held in memory. Other formats are decoded at full size and
/// resized afterwards.
#[derive(Debug, Clone)]
pub struct ImageLoader {
    sample_size: u32,
    max_decode_bytes: Option<u64>,
}

impl ImageLoader {
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            sample_size: config.sample_size.max(1),
            max_decode_bytes: config.max_decode_bytes,
        }
    }

    pub fn with_sample_size(mut self, sample_size: u32) -> Self {
        self.sample_size = sample_size.max(1);
        self
    }

    pub fn sample_size(&self) -> u32 {
        self.sample_size
    }

    #[instrument(skip(self, path), fields(path = %path.display(), sample_size = self.sample_size))]
    pub fn load(&self, path: &Path) -> Result<RasterImage, MeasurementError> {
        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => MeasurementError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => decode_failure(path, e),
        })?;
        if !metadata.is_file() {
            return Err(MeasurementError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let (image, source_dimensions) = self.decode(path)?;
        let image = downsample(image, source_dimensions, self.sample_size);
        debug!(
            "Decoded {}x{} image into {}x{} raster",
            source_dimensions.0,
            source_dimensions.1,
            image.width(),
            image.height()
        );

        Ok(RasterImage::new(image, source_dimensions, self.sample_size))
    }

    /// Runs [`ImageLoader::load`] on the blocking pool.
    pub async fn load_async(&self, path: PathBuf) -> Result<RasterImage, MeasurementError> {
        let loader = self.clone();
        let task_path = path.clone();
        tokio::task::spawn_blocking(move || loader.load(&task_path))
            .await
            .map_err(|e| decode_failure(&path, format!("decoder task failed: {}", e)))?
    }

    fn decode(&self, path: &Path) -> Result<(DynamicImage, (u32, u32)), MeasurementError> {
        let mut reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| decode_failure(path, e))?;

        if self.sample_size > 1 && reader.format() == Some(ImageFormat::Jpeg) {
            if let Some(decoded) = self.decode_reduced_jpeg(path)? {
                return Ok(decoded);
            }
        }

        let mut limits = Limits::default();
        limits.max_alloc = self.max_decode_bytes;
        reader.limits(limits);
        let image = reader.decode().map_err(|e| decode_failure(path, e))?;
        let source_dimensions = (image.width(), image.height());
        Ok((image, source_dimensions))
    }

    /// Decodes a JPEG at the smallest IDCT scale (1/8, 1/4, 1/2) that still
    /// covers the target raster. `None` for pixel formats that need the
    /// generic decoder.
    fn decode_reduced_jpeg(
        &self,
        path: &Path,
    ) -> Result<Option<(DynamicImage, (u32, u32))>, MeasurementError> {
        let file = File::open(path).map_err(|e| decode_failure(path, e))?;
        let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(file));
        decoder.read_info().map_err(|e| decode_failure(path, e))?;
        let info = decoder
            .info()
            .ok_or_else(|| decode_failure(path, "missing JPEG frame header"))?;

        let bytes_per_pixel: u64 = match info.pixel_format {
            PixelFormat::L8 => 1,
            PixelFormat::RGB24 => 3,
            _ => return Ok(None),
        };

        let sample_size = u16::try_from(self.sample_size).unwrap_or(u16::MAX);
        let (width, height) = decoder
            .scale(
                (info.width / sample_size).max(1),
                (info.height / sample_size).max(1),
            )
            .map_err(|e| decode_failure(path, e))?;

        let required = u64::from(width) * u64::from(height) * bytes_per_pixel;
        if let Some(limit) = self.max_decode_bytes {
            if required > limit {
                return Err(decode_failure(
                    path,
                    format!(
                        "Memory limit exceeded: {}x{} raster needs {} bytes, limit is {}",
                        width, height, required, limit
                    ),
                ));
            }
        }

        let pixels = decoder.decode().map_err(|e| decode_failure(path, e))?;
        let (width, height) = (u32::from(width), u32::from(height));
        let image = match info.pixel_format {
            PixelFormat::L8 => {
                GrayImage::from_raw(width, height, pixels).map(DynamicImage::ImageLuma8)
            }
            PixelFormat::RGB24 => {
                RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8)
            }
            _ => None,
        };
        let image = image
            .ok_or_else(|| decode_failure(path, "decoded JPEG does not match its frame size"))?;

        debug!(
            "Decoded JPEG at reduced scale {}x{}",
            image.width(),
            image.height()
        );
        Ok(Some((image, (u32::from(info.width), u32::from(info.height)))))
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new(&LoaderConfig::default())
    }
}

fn decode_failure(path: &Path, reason: impl ToString) -> MeasurementError {
    MeasurementError::DecodeFailure {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Brings a decoded image to `max(1, source / sample_size)` on each axis.
fn downsample(image: DynamicImage, source: (u32, u32), sample_size: u32) -> DynamicImage {
    let width = (source.0 / sample_size).max(1);
    let height = (source.1 / sample_size).max(1);
    if (image.width(), image.height()) == (width, height) {
        return image;
    }
    image.resize_exact(width, height, FilterType::Triangle)
}
