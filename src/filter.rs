//! Edge-preserving smoothing used by foundation.

use image::{Rgb, RgbImage};

use crate::mask::Mask;

/// Parameters for [`bilateral`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BilateralParams {
    /// Neighbourhood diameter in pixels.
    pub diameter: u32,
    /// Falloff over summed absolute channel difference.
    pub sigma_color: f32,
    /// Falloff over spatial distance in pixels.
    pub sigma_space: f32,
}

impl Default for BilateralParams {
    fn default() -> Self {
        Self {
            diameter: 15,
            sigma_color: 80.0,
            sigma_space: 80.0,
        }
    }
}

/// Bilateral filter evaluated only where `mask` is non-zero.
///
/// Pixels outside the mask are copied through unchanged. Neighbours are taken
/// from a circular window with replicated borders; each is weighted by its
/// spatial distance and by the L1 distance between its color and the centre
/// color, so edges between distinct colors survive the smoothing.
pub fn bilateral(image: &RgbImage, mask: &Mask, params: BilateralParams) -> RgbImage {
    let mut out = image.clone();
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return out;
    }

    let radius = (params.diameter / 2) as i32;
    let space_coeff = -0.5 / (params.sigma_space * params.sigma_space);
    let color_coeff = -0.5 / (params.sigma_color * params.sigma_color);

    let mut window: Vec<(i32, i32, f32)> = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r2 = (dx * dx + dy * dy) as f32;
            if r2 <= (radius * radius) as f32 {
                window.push((dx, dy, (r2 * space_coeff).exp()));
            }
        }
    }

    let max_x = width as i32 - 1;
    let max_y = height as i32 - 1;

    for (x, y, _) in mask.covered() {
        if x >= width || y >= height {
            continue;
        }
        let centre = image.get_pixel(x, y).0;
        let mut sum = [0.0f32; 3];
        let mut norm = 0.0f32;

        for &(dx, dy, space_w) in &window {
            let nx = (x as i32 + dx).clamp(0, max_x) as u32;
            let ny = (y as i32 + dy).clamp(0, max_y) as u32;
            let px = image.get_pixel(nx, ny).0;

            let diff: f32 = (0..3)
                .map(|c| (px[c] as f32 - centre[c] as f32).abs())
                .sum();
            let w = space_w * (diff * diff * color_coeff).exp();

            for c in 0..3 {
                sum[c] += px[c] as f32 * w;
            }
            norm += w;
        }

        if norm > 0.0 {
            out.put_pixel(
                x,
                y,
                Rgb(sum.map(|s| (s / norm).round().clamp(0.0, 255.0) as u8)),
            );
        }
    }

    out
}
