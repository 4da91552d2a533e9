//! Facial regions expressed as face mesh landmark indices.
//!
//! The index lists follow the 468-point face mesh topology and must match it
//! exactly; they cannot be derived from anything else. Some lists repeat
//! indices (`chin` cycles the same five points three times, `right_eyebrow`
//! repeats 276 and 334). The repeats are kept as-is so masks trace the same
//! polygons as every other consumer of these tables.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

const LIPS: &[usize] = &[0, 17, 18, 200, 199, 175, 13, 312, 311, 310, 415, 308, 324, 318];

const LEFT_EYE: &[usize] = &[
    33, 7, 163, 144, 145, 153, 154, 155, 133, 173, 157, 158, 159, 160, 161, 246,
];

const RIGHT_EYE: &[usize] = &[
    362, 382, 381, 380, 374, 373, 390, 249, 263, 466, 388, 387, 386, 385, 384, 398,
];

const LEFT_EYEBROW: &[usize] = &[46, 53, 52, 51, 48, 115, 131, 134, 102, 49, 220, 305];

const RIGHT_EYEBROW: &[usize] = &[276, 283, 282, 295, 285, 336, 296, 334, 293, 300, 276, 334];

const NOSE: &[usize] = &[
    1, 2, 5, 4, 6, 19, 94, 168, 8, 9, 10, 151, 195, 197, 196, 3, 51, 48, 115, 131, 134, 102,
];

const CHEEKS_LEFT: &[usize] = &[
    116, 117, 118, 119, 120, 121, 126, 142, 36, 205, 206, 207, 213, 192, 147,
];

const CHEEKS_RIGHT: &[usize] = &[
    345, 346, 347, 348, 349, 350, 451, 452, 453, 464, 435, 410, 454, 323, 366,
];

const FOREHEAD: &[usize] = &[
    10, 151, 9, 8, 107, 55, 65, 52, 53, 46, 70, 63, 105, 66, 108, 69, 104, 68, 71, 139,
];

const CHIN: &[usize] = &[
    175, 199, 200, 17, 18, 175, 199, 200, 17, 18, 175, 199, 200, 17, 18,
];

const FACE_OUTLINE: &[usize] = &[
    10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379, 378, 400, 377,
    152, 148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54, 103, 67, 109,
];

/// A named facial region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Lips,
    LeftEye,
    RightEye,
    LeftEyebrow,
    RightEyebrow,
    Nose,
    CheeksLeft,
    CheeksRight,
    Forehead,
    Chin,
    /// Outer contour of the face; only used for foundation.
    FaceOutline,
}

impl Region {
    /// The ten feature regions, excluding [`Region::FaceOutline`].
    pub const ALL: [Region; 10] = [
        Region::Lips,
        Region::LeftEye,
        Region::RightEye,
        Region::LeftEyebrow,
        Region::RightEyebrow,
        Region::Nose,
        Region::CheeksLeft,
        Region::CheeksRight,
        Region::Forehead,
        Region::Chin,
    ];

    /// Ordered landmark indices tracing this region.
    pub const fn indices(self) -> &'static [usize] {
        match self {
            Region::Lips => LIPS,
            Region::LeftEye => LEFT_EYE,
            Region::RightEye => RIGHT_EYE,
            Region::LeftEyebrow => LEFT_EYEBROW,
            Region::RightEyebrow => RIGHT_EYEBROW,
            Region::Nose => NOSE,
            Region::CheeksLeft => CHEEKS_LEFT,
            Region::CheeksRight => CHEEKS_RIGHT,
            Region::Forehead => FOREHEAD,
            Region::Chin => CHIN,
            Region::FaceOutline => FACE_OUTLINE,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Region::Lips => "lips",
            Region::LeftEye => "left_eye",
            Region::RightEye => "right_eye",
            Region::LeftEyebrow => "left_eyebrow",
            Region::RightEyebrow => "right_eyebrow",
            Region::Nose => "nose",
            Region::CheeksLeft => "cheeks_left",
            Region::CheeksRight => "cheeks_right",
            Region::Forehead => "forehead",
            Region::Chin => "chin",
            Region::FaceOutline => "face_outline",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Region {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .iter()
            .chain(std::iter::once(&Region::FaceOutline))
            .copied()
            .find(|r| r.name() == s)
            .ok_or_else(|| format!("unknown region: {s}"))
    }
}
