use std::iter::Sum;
use std::ops::{Add, Index, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Number of points in the face mesh topology the region table is written against.
pub const LANDMARK_COUNT: usize = 468;

/// Confidence reported when a provider does not supply one.
pub const DEFAULT_CONFIDENCE: f32 = 0.95;

/// A position in image space. Whole-number coordinates name pixel centres.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Point) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Point) -> f32 {
        (self - other).length()
    }

    /// The point `t` of the way from `self` to `to`.
    pub fn lerp(self, to: Point, t: f32) -> Point {
        self + (to - self) * t
    }

    /// Distance to the nearest point of the segment `a`-`b`.
    pub fn distance_to_segment(self, a: Point, b: Point) -> f32 {
        let ab = b - a;
        let len_sq = ab.dot(ab);
        if len_sq == 0.0 {
            return self.distance(a);
        }
        let t = ((self - a).dot(ab) / len_sq).clamp(0.0, 1.0);
        self.distance(a.lerp(b, t))
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(self, k: f32) -> Point {
        Point::new(self.x * k, self.y * k)
    }
}

impl Sum for Point {
    fn sum<I: Iterator<Item = Point>>(iter: I) -> Point {
        iter.fold(Point::default(), |acc, p| acc + p)
    }
}

/// One face mesh landmark: pixel position plus relative depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: i32,
    pub y: i32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: i32, y: i32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_point(&self) -> Point {
        Point::new(self.x as f32, self.y as f32)
    }
}

/// Pixel dimensions of the image the landmarks were detected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// The landmarks of a single detected face.
///
/// Deserializes from the same document the `landmarks` action prints, so the
/// output of one run can be fed back in as a provider input. `total_points`
/// is accepted and ignored; `confidence` defaults to [`DEFAULT_CONFIDENCE`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LandmarkSet {
    pub landmarks: Vec<Landmark>,
    pub image_size: ImageSize,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 {
    DEFAULT_CONFIDENCE
}

impl LandmarkSet {
    pub fn new(landmarks: Vec<Landmark>, image_size: ImageSize) -> Self {
        Self {
            landmarks,
            image_size,
            confidence: DEFAULT_CONFIDENCE,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Landmark> {
        self.landmarks.get(idx)
    }

    /// Look up `indices` in order, dropping any the set does not contain.
    pub fn resolve(&self, indices: &[usize]) -> Vec<Point> {
        indices
            .iter()
            .filter_map(|&i| self.landmarks.get(i))
            .map(Landmark::to_point)
            .collect()
    }

    /// Pull every landmark inside `[0, width) x [0, height)`.
    ///
    /// Returns the number of landmarks that had to move.
    pub fn clamp_to_image(&mut self) -> usize {
        let max_x = self.image_size.width.saturating_sub(1) as i32;
        let max_y = self.image_size.height.saturating_sub(1) as i32;
        let mut moved = 0;
        for lm in &mut self.landmarks {
            let (x, y) = (lm.x.clamp(0, max_x), lm.y.clamp(0, max_y));
            if (x, y) != (lm.x, lm.y) {
                lm.x = x;
                lm.y = y;
                moved += 1;
            }
        }
        moved
    }
}

impl Index<usize> for LandmarkSet {
    type Output = Landmark;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.landmarks[idx]
    }
}
