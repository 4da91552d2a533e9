use image::{Rgb, RgbImage};

use crate::types::Point;

/// Draw straight segments joining consecutive `points`.
///
/// Each segment covers the pixels whose centre lies within `thickness / 2`
/// of it (at least half a pixel), giving round joins and caps.
pub fn polyline(image: &mut RgbImage, points: &[Point], color: Rgb<u8>, thickness: u32) {
    for pair in points.windows(2) {
        segment(image, pair[0], pair[1], color, thickness);
    }
}

/// Draw a single segment from `a` to `b`.
pub fn segment(image: &mut RgbImage, a: Point, b: Point, color: Rgb<u8>, thickness: u32) {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return;
    }

    let half = (thickness as f32 / 2.0).max(0.5);
    let x0 = (a.x.min(b.x) - half).floor().max(0.0) as u32;
    let y0 = (a.y.min(b.y) - half).floor().max(0.0) as u32;
    let x1 = ((a.x.max(b.x) + half).ceil().max(0.0) as u32).min(width - 1);
    let y1 = ((a.y.max(b.y) + half).ceil().max(0.0) as u32).min(height - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = Point::new(x as f32, y as f32);
            if p.distance_to_segment(a, b) <= half {
                image.put_pixel(x, y, color);
            }
        }
    }
}
