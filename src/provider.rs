//! Landmark providers.
//!
//! Landmark detection itself happens outside this crate. A provider hands
//! back the 468-point face mesh for the first face in an image, or `None`
//! when there is no face. Implement [`LandmarkProvider`] to plug in a
//! detector directly, or use one of the bundled providers:
//!
//! - [`FixedLandmarks`]: a landmark set already in memory,
//! - [`LandmarkFile`]: a JSON landmark document on disk,
//! - [`SidecarFile`]: `<image>.landmarks.json` next to the input image,
//! - [`DetectorCommand`]: an external program that prints a landmark document.
//!
//! Landmark documents use the same shape the `landmarks` action prints:
//!
//! ```json
//! {"landmarks": [{"x": 120, "y": 88, "z": -0.02}], "image_size": {"width": 640, "height": 480}, "confidence": 0.95}
//! ```
//!
//! A `null` document or an empty `landmarks` array means no face.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::RgbImage;
use log::debug;

use crate::error::{Error, Result};
use crate::types::LandmarkSet;

/// What a provider gets to look at: the decoded pixels and, when the image
/// came from disk, its path.
#[derive(Debug, Clone, Copy)]
pub struct ImageSource<'a> {
    pub image: &'a RgbImage,
    pub path: Option<&'a Path>,
}

impl<'a> ImageSource<'a> {
    pub fn new(image: &'a RgbImage) -> Self {
        Self { image, path: None }
    }

    pub fn with_path(mut self, path: &'a Path) -> Self {
        self.path = Some(path);
        self
    }

    fn require_path(&self, provider: &str) -> Result<&'a Path> {
        self.path
            .ok_or_else(|| Error::Provider(format!("{provider} needs an image on disk")))
    }
}

/// Pluggable landmark detection backend.
pub trait LandmarkProvider: Send + Sync {
    /// Landmarks of the first face in `source`, or `None` if there is no face.
    fn detect(&self, source: &ImageSource<'_>) -> Result<Option<LandmarkSet>>;
}

impl<P: LandmarkProvider + ?Sized> LandmarkProvider for Box<P> {
    fn detect(&self, source: &ImageSource<'_>) -> Result<Option<LandmarkSet>> {
        (**self).detect(source)
    }
}

/// Parse a landmark document.
pub fn parse_document(json: &str) -> Result<Option<LandmarkSet>> {
    let set: Option<LandmarkSet> = serde_json::from_str(json)?;
    Ok(set.filter(|s| !s.is_empty()))
}

/// Always returns the same landmarks, whatever the image.
#[derive(Debug, Clone, Default)]
pub struct FixedLandmarks(pub Option<LandmarkSet>);

impl FixedLandmarks {
    pub fn new(landmarks: LandmarkSet) -> Self {
        Self(Some(landmarks))
    }

    /// A provider that never finds a face.
    pub fn none() -> Self {
        Self(None)
    }
}

impl LandmarkProvider for FixedLandmarks {
    fn detect(&self, _source: &ImageSource<'_>) -> Result<Option<LandmarkSet>> {
        Ok(self.0.clone())
    }
}

/// Reads a landmark document from a fixed path.
#[derive(Debug, Clone)]
pub struct LandmarkFile {
    path: PathBuf,
}

impl LandmarkFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LandmarkProvider for LandmarkFile {
    fn detect(&self, _source: &ImageSource<'_>) -> Result<Option<LandmarkSet>> {
        debug!("Reading landmarks from {:?}", self.path);
        parse_document(&fs::read_to_string(&self.path)?)
    }
}

/// Reads `<image file name>.landmarks.json` from beside the input image.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarFile;

impl SidecarFile {
    pub fn path_for(image: &Path) -> PathBuf {
        let mut name = image.file_name().map(OsString::from).unwrap_or_default();
        name.push(".landmarks.json");
        image.with_file_name(name)
    }
}

impl LandmarkProvider for SidecarFile {
    fn detect(&self, source: &ImageSource<'_>) -> Result<Option<LandmarkSet>> {
        let sidecar = Self::path_for(source.require_path("sidecar landmark file")?);
        if !sidecar.exists() {
            return Err(Error::Provider(format!(
                "no landmark source: {} does not exist",
                sidecar.display()
            )));
        }
        LandmarkFile::new(sidecar).detect(source)
    }
}

/// Runs `<program> [args...] <image path>` and parses its standard output.
///
/// The image path always comes last, so a detector that takes it as a flag
/// value can be driven with `.arg("--image")` as the final argument.
///
/// A nonzero exit whose output says "No face detected" counts as no face;
/// any other nonzero exit is a provider error.
#[derive(Debug, Clone)]
pub struct DetectorCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl DetectorCommand {
    pub fn new<P: AsRef<Path>>(program: P) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl LandmarkProvider for DetectorCommand {
    fn detect(&self, source: &ImageSource<'_>) -> Result<Option<LandmarkSet>> {
        let image_path = source.require_path("detector command")?;
        debug!("Running {:?} on {:?}", self.program, image_path);

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(image_path)
            .output()
            .map_err(|e| Error::Provider(format!("failed to run {:?}: {e}", self.program)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            if stdout.contains("No face detected") {
                return Ok(None);
            }
            return Err(Error::Provider(format!(
                "{:?} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_document(&stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImageSize, Landmark};

    #[test]
    fn null_and_empty_documents_mean_no_face() {
        assert!(parse_document("null").unwrap().is_none());
        assert!(parse_document(r#"{"landmarks": [], "image_size": {"width": 1, "height": 1}}"#)
            .unwrap()
            .is_none());
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(matches!(parse_document("{\"landmarks\": 3}"), Err(Error::Json(_))));
    }

    #[test]
    fn fixed_provider_returns_its_set() {
        let set = LandmarkSet::new(vec![Landmark::new(1, 1, 0.0)], ImageSize::new(2, 2));
        let image = RgbImage::new(2, 2);
        let source = ImageSource::new(&image);

        assert_eq!(FixedLandmarks::new(set.clone()).detect(&source).unwrap(), Some(set));
        assert_eq!(FixedLandmarks::none().detect(&source).unwrap(), None);
    }

    #[test]
    fn sidecar_path_appends_suffix() {
        assert_eq!(
            SidecarFile::path_for(Path::new("shots/face.jpg")),
            PathBuf::from("shots/face.jpg.landmarks.json")
        );
    }

    /// `sh -c <script>`; the image path arrives as `$1`.
    #[cfg(unix)]
    fn shell_detector(script: &str) -> DetectorCommand {
        DetectorCommand::new("sh").arg("-c").arg(script).arg("detector")
    }

    #[cfg(unix)]
    #[test]
    fn detector_output_is_parsed() {
        let detector = shell_detector(
            r#"[ "$1" = "shots/face.png" ] || exit 3
printf '%s' '{"landmarks": [{"x": 1, "y": 2, "z": 0.5}], "image_size": {"width": 4, "height": 4}}'"#,
        );
        let image = RgbImage::new(4, 4);
        let source = ImageSource::new(&image).with_path(Path::new("shots/face.png"));

        let set = detector.detect(&source).unwrap().unwrap();
        assert_eq!(set.landmarks, vec![Landmark::new(1, 2, 0.5)]);
        assert_eq!(set.image_size, ImageSize::new(4, 4));
    }

    #[cfg(unix)]
    #[test]
    fn detector_reporting_no_face_means_none() {
        let detector = shell_detector("echo 'No face detected'; exit 1");
        let image = RgbImage::new(4, 4);
        let source = ImageSource::new(&image).with_path(Path::new("face.png"));

        assert_eq!(detector.detect(&source).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn detector_failure_is_a_provider_error() {
        let detector = shell_detector("echo 'model missing' >&2; exit 2");
        let image = RgbImage::new(4, 4);
        let source = ImageSource::new(&image).with_path(Path::new("face.png"));

        match detector.detect(&source) {
            Err(Error::Provider(msg)) => assert!(msg.contains("model missing"), "{msg}"),
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn missing_detector_program_is_a_provider_error() {
        let image = RgbImage::new(4, 4);
        let source = ImageSource::new(&image).with_path(Path::new("face.png"));
        assert!(matches!(
            DetectorCommand::new("/nonexistent/facepaint-detector").detect(&source),
            Err(Error::Provider(_))
        ));
    }

    #[test]
    fn path_based_providers_need_a_path() {
        let image = RgbImage::new(2, 2);
        let source = ImageSource::new(&image);
        assert!(matches!(SidecarFile.detect(&source), Err(Error::Provider(_))));
        assert!(matches!(
            DetectorCommand::new("detector").detect(&source),
            Err(Error::Provider(_))
        ));
    }
}
