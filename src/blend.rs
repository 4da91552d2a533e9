//! Per-pixel blending shared by every effect.
//!
//! All arithmetic is done in `f32` and rounded to nearest before clamping to
//! the 8-bit range, so a weight of 0 returns the original pixel and a weight
//! of 1 returns the target exactly.

use image::{Rgb, RgbImage};

use crate::mask::Mask;

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// `(1 - weight) * orig + weight * target` for one channel.
#[inline]
pub fn mix_channel(orig: u8, target: u8, weight: f32) -> u8 {
    let w = weight.clamp(0.0, 1.0);
    to_u8(orig as f32 * (1.0 - w) + target as f32 * w)
}

/// Channel-wise [`mix_channel`].
#[inline]
pub fn mix(orig: Rgb<u8>, target: Rgb<u8>, weight: f32) -> Rgb<u8> {
    Rgb([
        mix_channel(orig.0[0], target.0[0], weight),
        mix_channel(orig.0[1], target.0[1], weight),
        mix_channel(orig.0[2], target.0[2], weight),
    ])
}

/// `gain * v + offset`, clamped to the pixel range.
#[inline]
pub fn affine(px: Rgb<u8>, gain: f32, offset: f32) -> Rgb<u8> {
    Rgb(px.0.map(|c| to_u8(gain * c as f32 + offset)))
}

/// Blend a flat color into `image`, weighting each pixel by `mask * intensity`.
pub fn tint(image: &mut RgbImage, mask: &Mask, color: Rgb<u8>, intensity: f32) {
    for (x, y, w) in mask.covered() {
        if x < image.width() && y < image.height() {
            let px = image.get_pixel_mut(x, y);
            *px = mix(*px, color, w * intensity);
        }
    }
}

/// Blend `source` into `image`, weighting each pixel by `mask * intensity`.
pub fn blend_from(image: &mut RgbImage, source: &RgbImage, mask: &Mask, intensity: f32) {
    for (x, y, w) in mask.covered() {
        if x < image.width() && y < image.height() {
            let target = *source.get_pixel(x, y);
            let px = image.get_pixel_mut(x, y);
            *px = mix(*px, target, w * intensity);
        }
    }
}

/// Apply [`affine`] to every covered pixel.
pub fn adjust(image: &mut RgbImage, mask: &Mask, gain: f32, offset: f32) {
    for (x, y, _) in mask.covered() {
        if x < image.width() && y < image.height() {
            let px = image.get_pixel_mut(x, y);
            *px = affine(*px, gain, offset);
        }
    }
}
