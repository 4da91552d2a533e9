//! Request driver: decode, detect once, run the requested effects, encode.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use log::{debug, info, warn};
use serde::Serialize;

use crate::config::{EnhanceConfig, MakeupConfig};
use crate::effect::{EffectReport, Enhancement};
use crate::error::{Error, Result};
use crate::provider::{ImageSource, LandmarkProvider};
use crate::types::{ImageSize, Landmark, LandmarkSet, LANDMARK_COUNT};

/// File name prefix for makeup results.
pub const MAKEUP_PREFIX: &str = "mediapipe-makeup";

/// File name prefix for enhancement results.
pub const ENHANCE_PREFIX: &str = "mediapipe-enhanced";

pub const DEFAULT_OUTPUT_DIR: &str = "uploads";

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Apply every makeup effect `config` asks for, in fixed order, each on the
/// result of the one before.
pub fn apply_makeup(
    image: &mut RgbImage,
    landmarks: &LandmarkSet,
    config: &MakeupConfig,
) -> Vec<EffectReport> {
    config
        .requested()
        .map(|(kind, cfg)| kind.effect(cfg).apply(image, landmarks))
        .collect()
}

/// Apply the enabled enhancement filters: eyes, then nose, then lips.
pub fn apply_enhancement(
    image: &mut RgbImage,
    landmarks: &LandmarkSet,
    config: &EnhanceConfig,
) -> Vec<EffectReport> {
    Enhancement::ORDER
        .into_iter()
        .filter(|e| match e {
            Enhancement::Eyes => config.enhance_eyes,
            Enhancement::Nose => config.enhance_nose,
            Enhancement::Lips => config.enhance_lips,
        })
        .map(|e| e.effect().apply(image, landmarks))
        .collect()
}

/// Output of the `landmarks` action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandmarkReport {
    pub landmarks: Vec<Landmark>,
    pub total_points: usize,
    pub image_size: ImageSize,
    pub confidence: f32,
}

impl From<LandmarkSet> for LandmarkReport {
    fn from(set: LandmarkSet) -> Self {
        Self {
            total_points: set.len(),
            landmarks: set.landmarks,
            image_size: set.image_size,
            confidence: set.confidence,
        }
    }
}

/// A written result image.
#[derive(Debug, Clone)]
pub struct Processed {
    pub output_path: PathBuf,
    pub effects: Vec<EffectReport>,
}

/// Runs requests against one landmark provider and output directory.
///
/// Each call decodes its own copy of the input, so a pipeline can be shared
/// between threads.
pub struct FacePipeline {
    provider: Box<dyn LandmarkProvider>,
    output_dir: PathBuf,
    jpeg_quality: u8,
}

impl FacePipeline {
    pub fn new(provider: Box<dyn LandmarkProvider>) -> Self {
        Self {
            provider,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Directory results are written to (default: `uploads`). Created on
    /// first write.
    pub fn output_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// JPEG quality 1-100 (default: 95).
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Detect landmarks without editing anything.
    pub fn landmarks<P: AsRef<Path>>(&self, image_path: P) -> Result<LandmarkReport> {
        let path = image_path.as_ref();
        let image = load_image(path)?;
        Ok(self.detect(&image, path)?.into())
    }

    /// Apply makeup and write the result. Returns the output path.
    pub fn makeup<P: AsRef<Path>>(&self, image_path: P, config: &MakeupConfig) -> Result<Processed> {
        let path = image_path.as_ref();
        let mut image = load_image(path)?;
        let landmarks = self.detect(&image, path)?;

        let effects = apply_makeup(&mut image, &landmarks, config);
        let output_path = self.write(&image, MAKEUP_PREFIX)?;
        Ok(Processed {
            output_path,
            effects,
        })
    }

    /// Apply the enhancement filters and write the result.
    pub fn enhance<P: AsRef<Path>>(
        &self,
        image_path: P,
        config: &EnhanceConfig,
    ) -> Result<Processed> {
        let path = image_path.as_ref();
        let mut image = load_image(path)?;
        let landmarks = self.detect(&image, path)?;

        let effects = apply_enhancement(&mut image, &landmarks, config);
        let output_path = self.write(&image, ENHANCE_PREFIX)?;
        Ok(Processed {
            output_path,
            effects,
        })
    }

    fn detect(&self, image: &RgbImage, path: &Path) -> Result<LandmarkSet> {
        let source = ImageSource::new(image).with_path(path);
        let mut landmarks = self.provider.detect(&source)?.ok_or(Error::NoFaceDetected)?;

        let (width, height) = image.dimensions();
        if landmarks.image_size != ImageSize::new(width, height) {
            return Err(Error::ImageSizeMismatch {
                width,
                height,
                found_width: landmarks.image_size.width,
                found_height: landmarks.image_size.height,
            });
        }
        if landmarks.len() != LANDMARK_COUNT {
            warn!(
                "Expected {} landmarks, provider returned {}",
                LANDMARK_COUNT,
                landmarks.len()
            );
        }
        let moved = landmarks.clamp_to_image();
        if moved > 0 {
            debug!("Clamped {moved} landmarks into the image");
        }
        info!(
            "Detected {} landmarks (confidence {:.2})",
            landmarks.len(),
            landmarks.confidence
        );

        Ok(landmarks)
    }

    fn write(&self, image: &RgbImage, prefix: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let (path, file) = create_output(&self.output_dir, prefix, epoch_millis())?;

        if let Err(e) = encode_jpeg(file, image, self.jpeg_quality) {
            // Leave nothing half-written behind.
            let _ = fs::remove_file(&path);
            return Err(e);
        }

        info!("Wrote {}", path.display());
        Ok(path)
    }
}

fn load_image(path: &Path) -> Result<RgbImage> {
    debug!("Loading image {:?}", path);
    Ok(image::open(path)?.to_rgb8())
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Create `<prefix>-<millis>.jpg` in `dir`, never reusing an existing file.
///
/// When the name is taken (two requests in the same millisecond) a `-<n>`
/// counter is appended until creation succeeds.
pub fn create_output(dir: &Path, prefix: &str, millis: u128) -> Result<(PathBuf, File)> {
    let mut n = 0u32;
    loop {
        let name = if n == 0 {
            format!("{prefix}-{millis}.jpg")
        } else {
            format!("{prefix}-{millis}-{n}.jpg")
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

fn encode_jpeg(file: File, image: &RgbImage, quality: u8) -> Result<()> {
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, quality).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    writer.flush()?;
    Ok(())
}
