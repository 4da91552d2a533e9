//! Region masks: per-pixel coverage rasters built from landmark points.

use image::{imageops, ImageBuffer, Luma};

use crate::types::Point;

/// Minimum number of points that can enclose an area.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Standard deviation of the feathering blur. Matches a 31x31 Gaussian kernel
/// with automatic sigma: `0.3 * ((31 - 1) / 2 - 1) + 0.8`.
pub const FEATHER_SIGMA: f32 = 5.0;

/// Half-width of the feathering kernel.
const FEATHER_RADIUS: i64 = 15;

/// A coverage raster with the same dimensions as the image it masks.
///
/// Each cell holds a weight in `[0, 1]`. Polygon masks only hold 0 or 1,
/// gradient masks hold feathered values in between.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    data: Vec<f32>,
    width: u32,
    height: u32,
}

impl Mask {
    /// An empty mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0.0; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(u32, u32) -> f32,
    {
        let mut data = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y).clamp(0.0, 1.0));
            }
        }
        Self { data, width, height }
    }

    /// Fill the closed polygon traced by `points`, outline included.
    ///
    /// Landmark coordinates name pixel centres, so a vertex at (10, 10) covers
    /// pixel (10, 10). The interior uses the even-odd rule, so
    /// self-intersecting outlines fill the same way on every run; the edges
    /// are then drawn on top, which keeps degenerate (collinear) outlines
    /// visible. Returns `None` when fewer than `min_points` points are
    /// available.
    pub fn polygon(width: u32, height: u32, points: &[Point], min_points: usize) -> Option<Self> {
        if points.len() < min_points.max(MIN_POLYGON_POINTS) {
            return None;
        }

        let mut mask = Self::new(width, height);
        let n = points.len();
        let mut crossings: Vec<f32> = Vec::with_capacity(n);

        for y in 0..height {
            let yc = y as f32;
            crossings.clear();

            for i in 0..n {
                let a = points[i];
                let b = points[(i + 1) % n];
                if (a.y <= yc) != (b.y <= yc) {
                    crossings.push(a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));

            for span in crossings.chunks_exact(2) {
                let start = span[0].ceil().max(0.0) as i64;
                let end = (span[1].floor() as i64).min(width as i64 - 1);
                for x in start..=end {
                    mask.mark(x, y as i64);
                }
            }
        }

        for i in 0..n {
            mask.mark_line(points[i], points[(i + 1) % n]);
        }

        Some(mask)
    }

    /// A feathered disc of `radius` pixels centred on the centroid of `points`.
    ///
    /// Returns `None` when fewer than [`MIN_POLYGON_POINTS`] points are available.
    pub fn gradient(width: u32, height: u32, points: &[Point], radius: u32) -> Option<Self> {
        if points.len() < MIN_POLYGON_POINTS {
            return None;
        }

        let c = centroid(points);
        let (cx, cy) = (c.x.trunc() as i64, c.y.trunc() as i64);
        let r = radius as i64;

        // Only the window the blur can reach is rendered and feathered.
        let pad = r + FEATHER_RADIUS + 1;
        let x0 = (cx - pad).clamp(0, width as i64);
        let x1 = (cx + pad + 1).clamp(0, width as i64);
        let y0 = (cy - pad).clamp(0, height as i64);
        let y1 = (cy + pad + 1).clamp(0, height as i64);

        let mut mask = Self::new(width, height);
        if x0 >= x1 || y0 >= y1 {
            return Some(mask);
        }

        let (win_w, win_h) = ((x1 - x0) as u32, (y1 - y0) as u32);
        let disc: ImageBuffer<Luma<f32>, Vec<f32>> = ImageBuffer::from_fn(win_w, win_h, |x, y| {
            let dx = x0 + x as i64 - cx;
            let dy = y0 + y as i64 - cy;
            Luma([if dx * dx + dy * dy <= r * r { 1.0 } else { 0.0 }])
        });
        let feathered = imageops::blur(&disc, FEATHER_SIGMA);

        for (x, y, px) in feathered.enumerate_pixels() {
            mask.set(x0 as u32 + x, y0 as u32 + y, px.0[0]);
        }

        Some(mask)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Weight at (x, y). Returns 0 for out-of-bounds pixels.
    pub fn get(&self, x: i32, y: i32) -> f32 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0.0;
        }
        self.data[y as usize * self.width as usize + x as usize]
    }

    fn set(&mut self, x: u32, y: u32, value: f32) {
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = value.clamp(0.0, 1.0);
    }

    /// Set (x, y) to full weight if it lies inside the mask.
    fn mark(&mut self, x: i64, y: i64) {
        if x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64 {
            self.set(x as u32, y as u32, 1.0);
        }
    }

    /// One-pixel line from `a` to `b`, sampled once per pixel step.
    fn mark_line(&mut self, a: Point, b: Point) {
        let d = b - a;
        let steps = d.x.abs().max(d.y.abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let p = a.lerp(b, i as f32 / steps as f32);
            self.mark(p.x.round() as i64, p.y.round() as i64);
        }
    }

    /// Number of pixels with non-zero weight.
    pub fn coverage(&self) -> usize {
        self.data.iter().filter(|&&w| w > 0.0).count()
    }

    /// Iterate `(x, y, weight)` over pixels with non-zero weight.
    pub fn covered(&self) -> impl Iterator<Item = (u32, u32, f32)> + '_ {
        let width = self.width as usize;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, w)| **w > 0.0)
            .map(move |(i, &w)| ((i % width) as u32, (i / width) as u32, w))
    }
}

/// Mean of `points`. Returns the origin for an empty slice.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::default();
    }
    points.iter().copied().sum::<Point>() * (1.0 / points.len() as f32)
}
