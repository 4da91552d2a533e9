//! # facepaint
//!
//! Landmark-driven makeup and facial enhancement for still images.
//!
//! This crate provides:
//! - **Region table**: named facial regions as 468-point face mesh indices
//! - **Masks**: filled polygons and feathered discs built from landmarks
//! - **Effects**: lipstick, eyeshadow, blush, eyeliner, foundation, and
//!   eye/nose/lip enhancement, all sharing one blending core
//! - **Pipeline**: decode, detect once, apply effects in fixed order, write JPEG
//!
//! Landmark detection is not part of this crate. Supply landmarks through a
//! [`LandmarkProvider`]: a JSON document, an external detector command, or
//! your own implementation.
//!
//! ## Effect order
//!
//! Requested makeup is always applied as lipstick, eyeshadow, blush,
//! eyeliner, foundation; enhancement as eyes, nose, lips. Each effect works
//! on the output of the previous one. A region whose landmarks cannot be
//! resolved is skipped without failing the request.
//!
//! ## Quick Start
//!
//! ```rust
//! use facepaint::{
//!     apply_makeup, EffectConfig, HexColor, ImageSize, Landmark, LandmarkSet, MakeupConfig,
//! };
//! use image::{Rgb, RgbImage};
//!
//! // Landmarks normally come from a detector; here every point is made up.
//! let landmarks = LandmarkSet::new(
//!     (0..468).map(|i| Landmark::new(i % 64, i / 8, 0.0)).collect(),
//!     ImageSize::new(64, 64),
//! );
//! let mut image = RgbImage::from_pixel(64, 64, Rgb([200, 160, 140]));
//!
//! let config = MakeupConfig {
//!     lipstick: Some(EffectConfig::default().with_color(HexColor::new(255, 0, 0))),
//!     ..Default::default()
//! };
//! let reports = apply_makeup(&mut image, &landmarks, &config);
//! assert_eq!(reports[0].effect, "lipstick");
//! ```
//!
//! ## Custom Providers
//!
//! ```rust
//! use facepaint::{ImageSource, LandmarkProvider, LandmarkSet, Result};
//!
//! struct MyDetector;
//!
//! impl LandmarkProvider for MyDetector {
//!     fn detect(&self, source: &ImageSource<'_>) -> Result<Option<LandmarkSet>> {
//!         // Run a face mesh model on `source.image` here
//!         Ok(None)
//!     }
//! }
//! ```

mod blend;
mod color;
mod config;
mod draw;
mod effect;
mod error;
mod filter;
mod mask;
mod pipeline;
pub mod provider;
mod regions;
mod types;

pub use color::HexColor;
pub use config::{EffectConfig, EnhanceConfig, MakeupConfig};
pub use effect::{
    EffectReport, Enhancement, Makeup, MakeupDefaults, MaskStyle, Paint, RegionEffect, Stage,
};
pub use error::{Error, Result};
pub use filter::BilateralParams;
pub use mask::{centroid, Mask};
pub use pipeline::{
    apply_enhancement, apply_makeup, create_output, FacePipeline, LandmarkReport, Processed,
    DEFAULT_OUTPUT_DIR, ENHANCE_PREFIX, MAKEUP_PREFIX,
};
pub use provider::{
    DetectorCommand, FixedLandmarks, ImageSource, LandmarkFile, LandmarkProvider, SidecarFile,
};
pub use regions::Region;
pub use types::{ImageSize, Landmark, LandmarkSet, Point, LANDMARK_COUNT};
