//! Shared test utilities for the imgscript test suite.
//!
//! Provides the canonical 3x3 sample image, a terse row-literal builder, and
//! a row-by-row assertion that prints the whole grid on mismatch.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut img = sample_image();
//! img.flip_vertical();
//! assert_rows(&img, &[
//!     &[(7, 8, 9), (4, 5, 6), (1, 2, 3)],
//!     &[(17, 18, 19), (14, 15, 16), (11, 12, 13)],
//!     &[(27, 28, 29), (24, 25, 26), (21, 22, 23)],
//! ]);
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::imaging::{Image, Pixel};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/sample.ppm` into a fresh temp directory.
///
/// Returns the directory guard and the path of the copied file.
pub fn setup_fixtures() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let src = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/sample.ppm");
    let dst = tmp.path().join("sample.ppm");
    std::fs::copy(&src, &dst).unwrap();
    (tmp, dst)
}

// =========================================================================
// Builders
// =========================================================================

/// The 3x3 image stored in `fixtures/sample.ppm`.
///
/// Row `r`, column `c` holds `(10r + 3c + 1, 10r + 3c + 2, 10r + 3c + 3)`.
pub fn sample_image() -> Image {
    image_from_rows(&[
        &[(1, 2, 3), (4, 5, 6), (7, 8, 9)],
        &[(11, 12, 13), (14, 15, 16), (17, 18, 19)],
        &[(21, 22, 23), (24, 25, 26), (27, 28, 29)],
    ])
}

/// Build an image from row literals. Panics on ragged input.
pub fn image_from_rows(rows: &[&[(u8, u8, u8)]]) -> Image {
    let rows = rows
        .iter()
        .map(|row| row.iter().map(|&(r, g, b)| Pixel::rgb(r, g, b)).collect())
        .collect();
    Image::new(rows).unwrap()
}

// =========================================================================
// Assertions
// =========================================================================

/// Assert `image` matches `expected` exactly, dimensions included.
pub fn assert_rows(image: &Image, expected: &[&[(u8, u8, u8)]]) {
    let expected = image_from_rows(expected);
    assert_eq!(
        image, &expected,
        "\nactual:\n{image}\nexpected:\n{expected}"
    );
}
