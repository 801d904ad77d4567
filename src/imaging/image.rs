//! The pixel grid and its in-place transforms.
//!
//! An [`Image`] owns a `width × height` row-major buffer of [`Pixel`]s.
//! Dimensions are fixed at construction; every transform rewrites pixel
//! contents but never changes the shape. An image carries no name: identity
//! is assigned by the [`Registry`](crate::registry::Registry) when it is stored.
//!
//! `Clone` is a deep copy. The registry relies on this to hand out and mutate
//! copies without ever aliasing the stored original.

use super::calculations::{self, component_value, offset_channel};
use super::histogram::Histogram;
use super::params::{Component, Kernel, SepiaOverflow};
use super::pixel::Pixel;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("Invalid pixel: {0}")]
    InvalidPixel(String),
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("Pixel ({row}, {col}) is outside a {height}x{width} image")]
    OutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl Image {
    /// Build an image from rows of pixels.
    ///
    /// Fails with [`ImageError::InvalidImage`] if there are no rows, the first
    /// row is empty, or any row's length differs from the first row's.
    pub fn new(rows: Vec<Vec<Pixel>>) -> Result<Self, ImageError> {
        let width = match rows.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => {
                return Err(ImageError::InvalidImage(
                    "pixels must be non-empty and contain elements".into(),
                ));
            }
        };
        if let Some(bad) = rows.iter().position(|row| row.len() != width) {
            return Err(ImageError::InvalidImage(format!(
                "row {bad} has {} pixels, expected {width}",
                rows[bad].len()
            )));
        }
        let height = rows.len();
        Ok(Self {
            width,
            height,
            pixels: rows.into_iter().flatten().collect(),
        })
    }

    /// Build an image from a flat row-major buffer.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Pixel>) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidImage(format!(
                "dimensions must be at least 1x1, got {width}x{height}"
            )));
        }
        if pixels.len() != width * height {
            return Err(ImageError::InvalidImage(format!(
                "expected {} pixels for {width}x{height}, got {}",
                width * height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major view of every pixel.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> {
        self.pixels.chunks_exact(self.width)
    }

    /// Pixel at `(row, col)`, or [`ImageError::OutOfBounds`].
    pub fn get_pixel_at(&self, row: usize, col: usize) -> Result<Pixel, ImageError> {
        if row >= self.height || col >= self.width {
            return Err(ImageError::OutOfBounds {
                row,
                col,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.pixels[row * self.width + col])
    }

    /// Reverse the order of rows: the last row becomes the first.
    pub fn flip_horizontal(&mut self) {
        let (mut first, mut last) = (0, self.height - 1);
        while first < last {
            for col in 0..self.width {
                self.pixels
                    .swap(first * self.width + col, last * self.width + col);
            }
            first += 1;
            last -= 1;
        }
    }

    /// Reverse the order of pixels within each row.
    pub fn flip_vertical(&mut self) {
        for row in self.pixels.chunks_exact_mut(self.width) {
            row.reverse();
        }
    }

    /// Add `delta` to every channel, clamping each to `0..=255`.
    pub fn brighten(&mut self, delta: i32) {
        self.map_pixels(|p| Pixel::from_channels(p.channels().map(|c| offset_channel(c, delta))));
    }

    /// Replace every pixel with a grey pixel holding the chosen scalar.
    pub fn extract_component(&mut self, component: Component) {
        self.map_pixels(|p| Pixel::grey(component_value(p, component)));
    }

    pub fn greyscale(&mut self) {
        self.map_pixels(calculations::greyscale_pixel);
    }

    /// Sepia with the default [`SepiaOverflow::Skip`] policy.
    pub fn sepia(&mut self) {
        self.sepia_with(SepiaOverflow::default());
    }

    pub fn sepia_with(&mut self, overflow: SepiaOverflow) {
        self.map_pixels(|p| calculations::sepia_pixel(p, overflow));
    }

    pub fn blur(&mut self) {
        self.convolve(&Kernel::blur());
    }

    pub fn sharpen(&mut self) {
        self.convolve(&Kernel::sharpen());
    }

    /// Convolve against a snapshot of the current pixels, then swap it in.
    pub fn convolve(&mut self, kernel: &Kernel) {
        self.pixels = calculations::convolve(&self.pixels, self.width, self.height, kernel);
    }

    pub fn histogram(&self) -> Histogram {
        Histogram::from_pixels(&self.pixels)
    }

    fn map_pixels(&mut self, f: impl Fn(Pixel) -> Pixel) {
        for p in &mut self.pixels {
            *p = f(*p);
        }
    }
}

/// `"W H"` on the first line, then one line per row of space-separated pixels.
impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.width, self.height)?;
        for row in self.rows() {
            for (i, p) in row.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{p}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
