//! Parameter types for pixel transforms.
//!
//! These describe *what* a transform uses (which scalar to extract, which
//! colour matrix, which kernel), not how it is applied. The arithmetic lives
//! in [`calculations`](super::calculations).
//!
//! ## Types
//!
//! - [`Component`]: The scalar written into all three channels by component extraction.
//! - [`ColorMatrix`]: A fixed 3×3 linear colour transform (sepia, greyscale).
//! - [`Kernel`]: A square, odd-sized convolution kernel (blur, sharpen).
//! - [`SepiaOverflow`]: What sepia does when a computed channel exceeds 255.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scalar extracted per pixel by [`Image::extract_component`](super::Image::extract_component).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Red,
    Green,
    Blue,
    /// `0.2126·R + 0.7152·G + 0.0722·B`, truncated.
    Luma,
    /// `(R + G + B) / 3` in integer arithmetic, rounded down.
    Intensity,
    /// `max(R, G, B)`.
    Value,
}

impl Component {
    pub const ALL: [Component; 6] = [
        Component::Red,
        Component::Green,
        Component::Blue,
        Component::Luma,
        Component::Intensity,
        Component::Value,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Component::Red => "red",
            Component::Green => "green",
            Component::Blue => "blue",
            Component::Luma => "luma",
            Component::Intensity => "intensity",
            Component::Value => "value",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Component {
    type Err = String;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Component::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown component '{s}'"))
    }
}

/// A 3×3 matrix applied to `(R, G, B)` as a column vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix(pub [[f64; 3]; 3]);

impl ColorMatrix {
    pub const SEPIA: ColorMatrix = ColorMatrix([
        [0.393, 0.769, 0.189],
        [0.349, 0.686, 0.168],
        [0.272, 0.534, 0.131],
    ]);

    /// Every output row uses the first sepia row. These weights differ from
    /// [`Component::Luma`] and the two must not be unified.
    pub const GREYSCALE: ColorMatrix = ColorMatrix([
        [0.393, 0.769, 0.189],
        [0.393, 0.769, 0.189],
        [0.393, 0.769, 0.189],
    ]);
}

/// Policy for sepia outputs above 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SepiaOverflow {
    /// Leave the whole pixel untouched if any channel would exceed 255.
    #[default]
    Skip,
    /// Clamp each channel to 255 independently.
    Clamp,
}

/// Square convolution kernel with an odd side length.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f64>,
}

impl Kernel {
    /// 3×3 Gaussian-like blur (1/16, 1/8, 1/4).
    pub fn blur() -> Self {
        Self {
            size: 3,
            weights: vec![
                1.0 / 16.0, 1.0 / 8.0, 1.0 / 16.0,
                1.0 / 8.0,  1.0 / 4.0, 1.0 / 8.0,
                1.0 / 16.0, 1.0 / 8.0, 1.0 / 16.0,
            ],
        }
    }

    /// 5×5 sharpen: -1/8 ring, 1/4 inner ring, 1 at the centre.
    pub fn sharpen() -> Self {
        Self {
            size: 5,
            weights: vec![
                -0.125, -0.125, -0.125, -0.125, -0.125,
                -0.125,  0.25,   0.25,   0.25,  -0.125,
                -0.125,  0.25,   1.0,    0.25,  -0.125,
                -0.125,  0.25,   0.25,   0.25,  -0.125,
                -0.125, -0.125, -0.125, -0.125, -0.125,
            ],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Half the side length: taps span `-radius..=radius` on each axis.
    #[inline]
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Weight at kernel row `ky`, column `kx` (both `0..size`).
    #[inline]
    pub fn weight(&self, ky: usize, kx: usize) -> f64 {
        self.weights[ky * self.size + kx]
    }
}
