//! Region effects.
//!
//! Every cosmetic edit is a [`RegionEffect`]: a list of regions, a way of
//! turning each region into pixels to touch ([`Stage`]), and what to do with
//! those pixels ([`Paint`]). Regions are processed in order and each one
//! works on the output of the previous, so effects compose sequentially.
//!
//! Makeup kinds ([`Makeup`]) and enhancement filters ([`Enhancement`]) are
//! only different parameterizations of the same effect.

use image::RgbImage;
use log::{debug, warn};
use serde::Serialize;

use crate::blend;
use crate::color::HexColor;
use crate::config::EffectConfig;
use crate::draw;
use crate::filter::{self, BilateralParams};
use crate::mask::{Mask, MIN_POLYGON_POINTS};
use crate::regions::Region;
use crate::types::LandmarkSet;

/// Foundation traces a 36-point outline and refuses sparser ones.
pub const MIN_FACE_OUTLINE_POINTS: usize = 10;

/// The nose highlight needs enough points for a visible bridge line.
pub const MIN_NOSE_POINTS: usize = 5;

/// A stroke needs at least one segment.
pub const MIN_STROKE_POINTS: usize = 2;

/// How a region's points become a mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaskStyle {
    /// Filled polygon through the points.
    Polygon { min_points: usize },
    /// Feathered disc at the centroid of the points.
    Gradient { radius: u32 },
}

/// What happens to the pixels a mask covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    /// Blend toward a flat color.
    Tint { color: HexColor, intensity: f32 },
    /// Blend toward an edge-preserving smoothed copy of the image.
    Smooth {
        intensity: f32,
        params: BilateralParams,
    },
    /// `gain * v + offset` per channel.
    Adjust { gain: f32, offset: f32 },
}

/// How an effect touches a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stage {
    Masked { style: MaskStyle, paint: Paint },
    /// Line segments along the first half of the region's points.
    Stroke {
        color: HexColor,
        thickness: u32,
        min_points: usize,
    },
}

/// One configured effect.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionEffect {
    pub name: &'static str,
    pub regions: &'static [Region],
    pub stage: Stage,
}

/// What an effect did to each of its regions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EffectReport {
    pub effect: &'static str,
    pub applied: Vec<Region>,
    pub skipped: Vec<Region>,
}

impl EffectReport {
    /// True when every region was skipped.
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

impl RegionEffect {
    /// Apply the effect to `image` in place.
    ///
    /// Regions without enough resolvable landmarks are skipped and listed in
    /// the report; they never fail the call.
    pub fn apply(&self, image: &mut RgbImage, landmarks: &LandmarkSet) -> EffectReport {
        let mut report = EffectReport {
            effect: self.name,
            ..Default::default()
        };

        for &region in self.regions {
            let points = landmarks.resolve(region.indices());
            let done = match self.stage {
                Stage::Masked { style, paint } => {
                    let (width, height) = image.dimensions();
                    let mask = match style {
                        MaskStyle::Polygon { min_points } => {
                            Mask::polygon(width, height, &points, min_points)
                        }
                        MaskStyle::Gradient { radius } => {
                            Mask::gradient(width, height, &points, radius)
                        }
                    };
                    match mask {
                        Some(mask) if mask.coverage() > 0 => {
                            debug!("{}: {} covers {} px", self.name, region, mask.coverage());
                            paint_masked(image, &mask, paint);
                            true
                        }
                        _ => false,
                    }
                }
                Stage::Stroke {
                    color,
                    thickness,
                    min_points,
                } => {
                    if points.len() >= min_points.max(MIN_STROKE_POINTS) {
                        let upper = &points[..points.len() / 2];
                        draw::polyline(image, upper, color.to_rgb(), thickness);
                        true
                    } else {
                        false
                    }
                }
            };

            if done {
                report.applied.push(region);
            } else {
                warn!(
                    "{}: skipping {}, only {} of {} landmarks resolved",
                    self.name,
                    region,
                    points.len(),
                    region.indices().len()
                );
                report.skipped.push(region);
            }
        }

        report
    }
}

fn paint_masked(image: &mut RgbImage, mask: &Mask, paint: Paint) {
    match paint {
        Paint::Tint { color, intensity } => blend::tint(image, mask, color.to_rgb(), intensity),
        Paint::Smooth { intensity, params } => {
            let smoothed = filter::bilateral(image, mask, params);
            blend::blend_from(image, &smoothed, mask, intensity);
        }
        Paint::Adjust { gain, offset } => blend::adjust(image, mask, gain, offset),
    }
}

/// Default settings for a makeup kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MakeupDefaults {
    pub color: HexColor,
    pub intensity: f32,
    pub thickness: u32,
    pub radius: u32,
}

/// The five makeup effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Makeup {
    Lipstick,
    Eyeshadow,
    Blush,
    Eyeliner,
    Foundation,
}

const EYES: &[Region] = &[Region::LeftEye, Region::RightEye];
const CHEEKS: &[Region] = &[Region::CheeksLeft, Region::CheeksRight];
const LIPS: &[Region] = &[Region::Lips];
const NOSE: &[Region] = &[Region::Nose];
const FACE: &[Region] = &[Region::FaceOutline];

impl Makeup {
    /// Order in which requested makeup is applied.
    pub const ORDER: [Makeup; 5] = [
        Makeup::Lipstick,
        Makeup::Eyeshadow,
        Makeup::Blush,
        Makeup::Eyeliner,
        Makeup::Foundation,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Makeup::Lipstick => "lipstick",
            Makeup::Eyeshadow => "eyeshadow",
            Makeup::Blush => "blush",
            Makeup::Eyeliner => "eyeliner",
            Makeup::Foundation => "foundation",
        }
    }

    pub const fn defaults(self) -> MakeupDefaults {
        let (color, intensity) = match self {
            Makeup::Lipstick => (HexColor::new(0xFF, 0x17, 0x44), 0.7),
            Makeup::Eyeshadow => (HexColor::new(0x8D, 0x6E, 0x63), 0.5),
            Makeup::Blush => (HexColor::new(0xF8, 0xBB, 0xD9), 0.4),
            Makeup::Eyeliner => (HexColor::BLACK, 1.0),
            // Foundation blends toward the smoothed image; color is unused.
            Makeup::Foundation => (HexColor::BLACK, 0.3),
        };
        MakeupDefaults {
            color,
            intensity,
            thickness: 2,
            radius: 30,
        }
    }

    pub const fn regions(self) -> &'static [Region] {
        match self {
            Makeup::Lipstick => LIPS,
            Makeup::Eyeshadow | Makeup::Eyeliner => EYES,
            Makeup::Blush => CHEEKS,
            Makeup::Foundation => FACE,
        }
    }

    /// Build the effect for `cfg`, filling gaps from [`Makeup::defaults`].
    pub fn effect(self, cfg: &EffectConfig) -> RegionEffect {
        let d = self.defaults();
        let color = cfg.color.unwrap_or(d.color);
        let intensity = cfg.intensity.unwrap_or(d.intensity).clamp(0.0, 1.0);

        let stage = match self {
            Makeup::Lipstick | Makeup::Eyeshadow => Stage::Masked {
                style: MaskStyle::Polygon {
                    min_points: MIN_POLYGON_POINTS,
                },
                paint: Paint::Tint { color, intensity },
            },
            Makeup::Blush => Stage::Masked {
                style: MaskStyle::Gradient {
                    radius: cfg.radius.unwrap_or(d.radius),
                },
                paint: Paint::Tint { color, intensity },
            },
            Makeup::Eyeliner => Stage::Stroke {
                color,
                thickness: cfg.thickness.unwrap_or(d.thickness).max(1),
                min_points: MIN_STROKE_POINTS,
            },
            Makeup::Foundation => Stage::Masked {
                style: MaskStyle::Polygon {
                    min_points: MIN_FACE_OUTLINE_POINTS,
                },
                paint: Paint::Smooth {
                    intensity,
                    params: BilateralParams::default(),
                },
            },
        };

        RegionEffect {
            name: self.name(),
            regions: self.regions(),
            stage,
        }
    }
}

/// The three fixed enhancement filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Enhancement {
    Eyes,
    Nose,
    Lips,
}

impl Enhancement {
    /// Order in which enabled enhancements are applied.
    pub const ORDER: [Enhancement; 3] = [Enhancement::Eyes, Enhancement::Nose, Enhancement::Lips];

    pub const fn name(self) -> &'static str {
        match self {
            Enhancement::Eyes => "enhance_eyes",
            Enhancement::Nose => "enhance_nose",
            Enhancement::Lips => "enhance_lips",
        }
    }

    pub fn effect(self) -> RegionEffect {
        let polygon = MaskStyle::Polygon {
            min_points: MIN_POLYGON_POINTS,
        };
        let (regions, stage) = match self {
            Enhancement::Eyes => (
                EYES,
                Stage::Masked {
                    style: polygon,
                    paint: Paint::Adjust {
                        gain: 1.2,
                        offset: 10.0,
                    },
                },
            ),
            Enhancement::Nose => (
                NOSE,
                Stage::Stroke {
                    color: HexColor::WHITE,
                    thickness: 1,
                    min_points: MIN_NOSE_POINTS,
                },
            ),
            Enhancement::Lips => (
                LIPS,
                Stage::Masked {
                    style: polygon,
                    paint: Paint::Adjust {
                        gain: 1.1,
                        offset: 5.0,
                    },
                },
            ),
        };

        RegionEffect {
            name: self.name(),
            regions,
            stage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImageSize, Landmark, LANDMARK_COUNT};
    use image::Rgb;

    const SKIN: Rgb<u8> = Rgb([180, 140, 120]);

    /// A face whose every landmark sits at (1, 1), with `region` traced as a
    /// square from (x0, y0) to (x1, y1).
    fn face_with(region: Region, x0: i32, y0: i32, x1: i32, y1: i32) -> LandmarkSet {
        let mut landmarks = vec![Landmark::new(1, 1, 0.0); LANDMARK_COUNT];
        let corners = [(x0, y0), (x1, y0), (x1, y1), (x0, y1)];
        let indices = region.indices();
        for (k, &idx) in indices.iter().enumerate() {
            // Spread the points over the four corners in order, so the
            // polygon is the square traced once.
            let (x, y) = corners[k * 4 / indices.len()];
            landmarks[idx] = Landmark::new(x, y, 0.0);
        }
        LandmarkSet::new(landmarks, ImageSize::new(40, 40))
    }

    #[test]
    fn defaults_match_table() {
        assert_eq!(Makeup::Lipstick.defaults().color.to_string(), "#FF1744");
        assert_eq!(Makeup::Eyeshadow.defaults().intensity, 0.5);
        assert_eq!(Makeup::Blush.defaults().radius, 30);
        assert_eq!(Makeup::Eyeliner.defaults().thickness, 2);
        assert_eq!(Makeup::Foundation.defaults().intensity, 0.3);
    }

    #[test]
    fn intensity_is_clamped() {
        let effect = Makeup::Lipstick.effect(&EffectConfig::default().with_intensity(3.0));
        match effect.stage {
            Stage::Masked {
                paint: Paint::Tint { intensity, .. },
                ..
            } => assert_eq!(intensity, 1.0),
            other => panic!("unexpected stage {other:?}"),
        }
    }

    #[test]
    fn lipstick_full_intensity_paints_exact_color() {
        let landmarks = face_with(Region::Lips, 10, 10, 20, 20);
        let mut image = RgbImage::from_pixel(40, 40, SKIN);
        let red = HexColor::new(255, 0, 0);

        let report = Makeup::Lipstick
            .effect(&EffectConfig::default().with_color(red).with_intensity(1.0))
            .apply(&mut image, &landmarks);

        assert_eq!(report.applied, vec![Region::Lips]);
        for (x, y, px) in image.enumerate_pixels() {
            let inside = (10..=20).contains(&x) && (10..=20).contains(&y);
            let expected = if inside { red.to_rgb() } else { SKIN };
            assert_eq!(*px, expected, "pixel ({x}, {y})");
        }
    }

    #[test]
    fn closed_lips_still_get_color() {
        // Every lip point on one row, as for a closed mouth.
        let mut landmarks = vec![Landmark::new(1, 1, 0.0); LANDMARK_COUNT];
        let lips = Region::Lips.indices();
        for (k, &idx) in lips.iter().enumerate() {
            landmarks[idx] = Landmark::new(10 + (k as i32 % 11), 15, 0.0);
        }
        let landmarks = LandmarkSet::new(landmarks, ImageSize::new(40, 40));
        let mut image = RgbImage::from_pixel(40, 40, SKIN);
        let red = HexColor::new(255, 0, 0);

        let report = Makeup::Lipstick
            .effect(&EffectConfig::default().with_color(red).with_intensity(1.0))
            .apply(&mut image, &landmarks);

        assert_eq!(report.applied, vec![Region::Lips]);
        for x in 10..=20 {
            assert_eq!(*image.get_pixel(x, 15), red.to_rgb(), "pixel ({x}, 15)");
        }
        assert_eq!(*image.get_pixel(15, 14), SKIN);
        assert_eq!(*image.get_pixel(15, 16), SKIN);
    }

    #[test]
    fn region_outside_image_is_skipped() {
        let mut landmarks = vec![Landmark::new(1, 1, 0.0); LANDMARK_COUNT];
        for region in [Region::CheeksLeft, Region::CheeksRight] {
            for &idx in region.indices() {
                landmarks[idx] = Landmark::new(400, 400, 0.0);
            }
        }
        let landmarks = LandmarkSet::new(landmarks, ImageSize::new(40, 40));
        let mut image = RgbImage::from_pixel(40, 40, SKIN);

        let report = Makeup::Blush
            .effect(&EffectConfig::default())
            .apply(&mut image, &landmarks);

        assert!(report.is_noop());
        assert_eq!(report.skipped, vec![Region::CheeksLeft, Region::CheeksRight]);
        assert!(image.pixels().all(|&p| p == SKIN));
    }

    #[test]
    fn zero_intensity_is_identity() {
        let landmarks = face_with(Region::Lips, 5, 5, 30, 30);
        let original = RgbImage::from_fn(40, 40, |x, y| Rgb([(x * 6) as u8, (y * 6) as u8, 77]));

        for kind in [Makeup::Lipstick, Makeup::Foundation] {
            let mut image = original.clone();
            kind.effect(&EffectConfig::default().with_intensity(0.0))
                .apply(&mut image, &landmarks);
            assert_eq!(image, original, "{} changed the image", kind.name());
        }
    }

    #[test]
    fn too_few_points_skips_region() {
        // Only the first two landmarks exist, so no region can resolve three.
        let landmarks = LandmarkSet::new(
            vec![Landmark::new(3, 3, 0.0), Landmark::new(9, 9, 0.0)],
            ImageSize::new(16, 16),
        );
        let original = RgbImage::from_pixel(16, 16, SKIN);

        for kind in Makeup::ORDER {
            let mut image = original.clone();
            let report = kind.effect(&EffectConfig::default()).apply(&mut image, &landmarks);
            assert!(report.is_noop(), "{} applied", kind.name());
            assert_eq!(report.skipped, kind.regions().to_vec());
            assert_eq!(image, original);
        }
    }

    #[test]
    fn eyeliner_draws_only_upper_half() {
        let mut landmarks = vec![Landmark::new(0, 0, 0.0); LANDMARK_COUNT];
        // Upper half of the left eye along y = 10, lower half along y = 30.
        let eye = Region::LeftEye.indices();
        for (k, &idx) in eye.iter().enumerate() {
            let y = if k < eye.len() / 2 { 10 } else { 30 };
            landmarks[idx] = Landmark::new(5 + 3 * (k as i32 % 8), y, 0.0);
        }
        let landmarks = LandmarkSet::new(landmarks, ImageSize::new(40, 40));
        let mut image = RgbImage::from_pixel(40, 40, SKIN);

        let report = Makeup::Eyeliner
            .effect(&EffectConfig::default().with_thickness(1))
            .apply(&mut image, &landmarks);

        assert!(report.applied.contains(&Region::LeftEye));
        assert_eq!(*image.get_pixel(10, 10), Rgb([0, 0, 0]));
        assert_eq!(*image.get_pixel(10, 30), SKIN);
    }

    #[test]
    fn eye_enhancement_brightens_inside_only() {
        let landmarks = face_with(Region::LeftEye, 4, 4, 12, 12);
        let mut image = RgbImage::from_pixel(40, 40, Rgb([100, 100, 100]));

        Enhancement::Eyes.effect().apply(&mut image, &landmarks);

        assert_eq!(*image.get_pixel(6, 6), Rgb([130, 130, 130]));
        assert_eq!(*image.get_pixel(20, 20), Rgb([100, 100, 100]));
    }

    #[test]
    fn nose_highlight_needs_five_points() {
        let landmarks = LandmarkSet::new(
            (0..4).map(|i| Landmark::new(i, i, 0.0)).collect(),
            ImageSize::new(8, 8),
        );
        let mut image = RgbImage::from_pixel(8, 8, SKIN);
        let report = Enhancement::Nose.effect().apply(&mut image, &landmarks);
        assert_eq!(report.skipped, vec![Region::Nose]);
    }
}
