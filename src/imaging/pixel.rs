//! A single RGB sample.
//!
//! Channels are semantically bounded to `0..=255`, but only non-negativity is
//! checked at construction. The upper bound is enforced by whichever transform
//! writes a new value (see [`calculations::clamp_channel`](super::calculations::clamp_channel)).

use super::image::ImageError;
use std::fmt;

/// One RGB triple. Equality and hashing are structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pixel {
    red: u32,
    green: u32,
    blue: u32,
}

impl Pixel {
    /// Build a pixel from signed channel values.
    ///
    /// Fails with [`ImageError::InvalidPixel`] if any channel is negative.
    pub fn new(red: i64, green: i64, blue: i64) -> Result<Self, ImageError> {
        if red < 0 || green < 0 || blue < 0 {
            return Err(ImageError::InvalidPixel(format!(
                "channels must be non-negative, got ({red}, {green}, {blue})"
            )));
        }
        let to_channel = |v: i64| {
            u32::try_from(v)
                .map_err(|_| ImageError::InvalidPixel(format!("channel value {v} is too large")))
        };
        Ok(Self {
            red: to_channel(red)?,
            green: to_channel(green)?,
            blue: to_channel(blue)?,
        })
    }

    /// Build a pixel from 8-bit channels. Infallible: every `u8` is valid.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as u32,
            green: green as u32,
            blue: blue as u32,
        }
    }

    /// Build a grey pixel with all three channels set to `value`.
    pub(crate) const fn grey(value: u32) -> Self {
        Self {
            red: value,
            green: value,
            blue: value,
        }
    }

    /// Build a pixel from already-validated channels.
    pub(crate) const fn from_channels([red, green, blue]: [u32; 3]) -> Self {
        Self { red, green, blue }
    }

    pub fn red(&self) -> u32 {
        self.red
    }

    pub fn green(&self) -> u32 {
        self.green
    }

    pub fn blue(&self) -> u32 {
        self.blue
    }

    /// Channels as `[r, g, b]`.
    pub fn channels(&self) -> [u32; 3] {
        [self.red, self.green, self.blue]
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(R:{}, G:{}, B:{})", self.red, self.green, self.blue)
    }
}
