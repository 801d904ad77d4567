//! Codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the boundary between the pixel engine and
//! file encodings: it turns a file into an [`Image`] and back. The engine
//! never knows which encoding was used.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): plain PPM through
//! [`ppm`](super::ppm), PNG/JPEG/BMP through the `image` crate.

use super::image::{Image, ImageError};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl From<ImageError> for BackendError {
    fn from(e: ImageError) -> Self {
        BackendError::Decode(e.to_string())
    }
}

/// File encodings the crate can read and write, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Plain (ASCII, `P3`) PPM.
    Ppm,
    Png,
    Jpeg,
    Bmp,
}

impl ImageFormat {
    const EXTENSIONS: &'static [(&'static str, ImageFormat)] = &[
        ("ppm", ImageFormat::Ppm),
        ("png", ImageFormat::Png),
        ("jpg", ImageFormat::Jpeg),
        ("jpeg", ImageFormat::Jpeg),
        ("bmp", ImageFormat::Bmp),
    ];

    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, BackendError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        Self::EXTENSIONS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, fmt)| *fmt)
            .ok_or_else(|| {
                BackendError::UnsupportedFormat(format!(
                    "'{}' (expected one of: {})",
                    path.display(),
                    Self::supported_extensions().join(", ")
                ))
            })
    }

    pub fn supported_extensions() -> Vec<&'static str> {
        Self::EXTENSIONS.iter().map(|(e, _)| *e).collect()
    }
}

/// Trait for codec backends.
///
/// Both directions must be implemented so the registry stays
/// backend-agnostic, and tests can swap in a mock.
pub trait ImageBackend {
    /// Read and decode the file at `path`.
    fn decode(&self, path: &Path) -> Result<Image, BackendError>;

    /// Encode `image` and write it to `path`.
    fn encode(&self, image: &Image, path: &Path) -> Result<(), BackendError>;
}
