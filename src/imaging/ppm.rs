//! Plain PPM (`P3`) reader and writer.
//!
//! Layout: the magic `P3`, then whitespace-separated width, height and max
//! channel value, then `width * height * 3` integers in row-major `R G B`
//! order. A `#` starts a comment that runs to the end of the line; comments
//! may appear anywhere before the pixel data.
//!
//! The reader does not rescale: channel values are taken as-is, and a value
//! above the declared max is a decode error.

use super::backend::BackendError;
use super::image::Image;
use super::pixel::Pixel;
use std::io::{BufRead, Write};

const MAGIC: &str = "P3";

/// Writer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PpmOptions {
    /// Written as `# <comment>` after the magic line. Empty means no comment.
    pub comment: String,
    /// Max channel value written in the header.
    pub max_value: u32,
}

impl Default for PpmOptions {
    fn default() -> Self {
        Self {
            comment: "Created by imgscript".to_string(),
            max_value: 255,
        }
    }
}

/// Decode a plain PPM from a buffered reader.
pub fn read_ppm<R: BufRead>(reader: R) -> Result<Image, BackendError> {
    let mut text = String::new();
    for line in reader.lines() {
        let line = line?;
        let data = line.split_once('#').map_or(line.as_str(), |(data, _)| data);
        text.push_str(data);
        text.push('\n');
    }
    parse_ppm(&text)
}

/// Decode a plain PPM from comment-free text.
fn parse_ppm(text: &str) -> Result<Image, BackendError> {
    let mut tokens = text.split_whitespace();

    match tokens.next() {
        Some(MAGIC) => {}
        Some(other) => {
            return Err(BackendError::Decode(format!(
                "expected magic {MAGIC}, found '{other}'"
            )));
        }
        None => return Err(BackendError::Decode("empty PPM file".into())),
    }

    let mut header = |field: &str| -> Result<usize, BackendError> {
        let token = tokens
            .next()
            .ok_or_else(|| BackendError::Decode(format!("missing {field} in PPM header")))?;
        token
            .parse::<usize>()
            .map_err(|_| BackendError::Decode(format!("invalid {field} '{token}' in PPM header")))
    };
    let width = header("width")?;
    let height = header("height")?;
    let max_value = header("max value")?;

    if width == 0 || height == 0 {
        return Err(BackendError::Decode(format!(
            "dimensions must be at least 1x1, got {width}x{height}"
        )));
    }
    if max_value == 0 || max_value > u16::MAX as usize {
        return Err(BackendError::Decode(format!(
            "max value must be in 1..=65535, got {max_value}"
        )));
    }

    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| {
            BackendError::Decode(format!("dimensions {width}x{height} are too large"))
        })?;
    // Every value takes at least two bytes of text, so the file bounds the count.
    let mut channels = Vec::with_capacity(expected.min(text.len() / 2));
    for token in tokens.by_ref().take(expected) {
        let value: i64 = token
            .parse()
            .map_err(|_| BackendError::Decode(format!("invalid channel value '{token}'")))?;
        if value > max_value as i64 {
            return Err(BackendError::Decode(format!(
                "channel value {value} exceeds max value {max_value}"
            )));
        }
        channels.push(value);
    }
    if channels.len() != expected {
        return Err(BackendError::Decode(format!(
            "expected {expected} channel values for {width}x{height}, found {}",
            channels.len()
        )));
    }

    let pixels = channels
        .chunks_exact(3)
        .map(|c| Pixel::new(c[0], c[1], c[2]))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Image::from_pixels(width, height, pixels)?)
}

/// Encode `image` as plain PPM, one pixel per line.
///
/// Fails with [`BackendError::Encode`] if a channel exceeds `max_value`.
pub fn write_ppm<W: Write>(
    image: &Image,
    mut writer: W,
    options: &PpmOptions,
) -> Result<(), BackendError> {
    if let Some(p) = image
        .pixels()
        .iter()
        .find(|p| p.channels().iter().any(|&c| c > options.max_value))
    {
        return Err(BackendError::Encode(format!(
            "pixel {p} exceeds max value {}",
            options.max_value
        )));
    }

    writeln!(writer, "{MAGIC}")?;
    if !options.comment.is_empty() {
        writeln!(writer, "# {}", options.comment)?;
    }
    writeln!(writer, "{} {}", image.width(), image.height())?;
    writeln!(writer, "{}", options.max_value)?;
    for p in image.pixels() {
        let [r, g, b] = p.channels();
        writeln!(writer, "{r} {g} {b}")?;
    }
    writer.flush()?;
    Ok(())
}
