use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),

    #[error("No face detected")]
    NoFaceDetected,

    #[error("Landmark provider failed: {0}")]
    Provider(String),

    #[error("Landmarks were detected on a {found_width}x{found_height} image, expected {width}x{height}")]
    ImageSizeMismatch {
        width: u32,
        height: u32,
        found_width: u32,
        found_height: u32,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
