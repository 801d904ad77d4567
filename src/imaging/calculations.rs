//! Pure per-pixel arithmetic.
//!
//! Everything here is a function from input values to output values with no
//! I/O and no mutation of shared state, so the numeric policies (truncation,
//! clamping, kernel boundary handling) can be tested in isolation.

use super::params::{ColorMatrix, Component, Kernel, SepiaOverflow};
use super::pixel::Pixel;

/// Upper bound every transform clamps its output to.
pub const CHANNEL_MAX: u32 = 255;

/// Truncate toward zero and clamp into `0..=255`.
#[inline]
pub fn clamp_channel(value: f64) -> u32 {
    value.clamp(0.0, CHANNEL_MAX as f64) as u32
}

/// Add a signed delta to a channel, clamped into `0..=255`.
#[inline]
pub fn offset_channel(channel: u32, delta: i32) -> u32 {
    (i64::from(channel) + i64::from(delta)).clamp(0, i64::from(CHANNEL_MAX)) as u32
}

/// Integer mean of the three channels, rounded down.
#[inline]
pub fn intensity(pixel: Pixel) -> u32 {
    let [r, g, b] = pixel.channels();
    ((u64::from(r) + u64::from(g) + u64::from(b)) / 3) as u32
}

/// Scalar that component extraction writes into all three channels.
pub fn component_value(pixel: Pixel, component: Component) -> u32 {
    let [r, g, b] = pixel.channels();
    match component {
        Component::Red => r,
        Component::Green => g,
        Component::Blue => b,
        Component::Luma => {
            (0.2126 * f64::from(r) + 0.7152 * f64::from(g) + 0.0722 * f64::from(b)) as u32
        }
        Component::Intensity => intensity(pixel),
        Component::Value => r.max(g).max(b),
    }
}

/// Multiply `(R, G, B)` by the matrix. Outputs are unclamped.
pub fn apply_matrix(pixel: Pixel, matrix: &ColorMatrix) -> [f64; 3] {
    let [r, g, b] = pixel.channels().map(f64::from);
    matrix.0.map(|row| row[0] * r + row[1] * g + row[2] * b)
}

/// Greyscale output for one pixel: each channel capped at 255 and truncated.
pub fn greyscale_pixel(pixel: Pixel) -> Pixel {
    Pixel::from_channels(apply_matrix(pixel, &ColorMatrix::GREYSCALE).map(clamp_channel))
}

/// Sepia output for one pixel.
///
/// With [`SepiaOverflow::Skip`] the input pixel is returned unchanged when
/// any computed channel exceeds 255.
pub fn sepia_pixel(pixel: Pixel, overflow: SepiaOverflow) -> Pixel {
    let out = apply_matrix(pixel, &ColorMatrix::SEPIA);
    let overflows = out.iter().any(|&c| c > CHANNEL_MAX as f64);
    match overflow {
        SepiaOverflow::Skip if overflows => pixel,
        _ => Pixel::from_channels(out.map(clamp_channel)),
    }
}

/// Convolve a row-major pixel buffer with `kernel`, per channel.
///
/// Reads only from `src` and returns a fresh buffer, so every output depends
/// solely on the pre-transform input. Taps that fall outside the image are
/// skipped (they contribute nothing and the remaining weights are not
/// renormalised). Each output channel is truncated and clamped to `0..=255`.
pub fn convolve(src: &[Pixel], width: usize, height: usize, kernel: &Kernel) -> Vec<Pixel> {
    debug_assert_eq!(src.len(), width * height);
    let radius = kernel.radius() as isize;
    let mut dst = Vec::with_capacity(src.len());

    for row in 0..height as isize {
        for col in 0..width as isize {
            let mut sums = [0.0f64; 3];

            for dy in -radius..=radius {
                let sy = row + dy;
                if sy < 0 || sy >= height as isize {
                    continue;
                }
                for dx in -radius..=radius {
                    let sx = col + dx;
                    if sx < 0 || sx >= width as isize {
                        continue;
                    }
                    let weight = kernel.weight((dy + radius) as usize, (dx + radius) as usize);
                    let tap = src[sy as usize * width + sx as usize].channels();
                    for (sum, channel) in sums.iter_mut().zip(tap) {
                        *sum += f64::from(channel) * weight;
                    }
                }
            }

            dst.push(Pixel::from_channels(sums.map(clamp_channel)));
        }
    }

    dst
}
