//! Per-channel frequency tables.
//!
//! A [`Histogram`] counts how often each scalar `0..=255` occurs in the red,
//! green and blue channels, plus an intensity table built from the integer
//! channel mean (rounded down). Channels above 255 (possible only for images
//! loaded from a PPM with a larger max value) are counted in the top bucket.

use super::calculations::{CHANNEL_MAX, intensity};
use super::pixel::Pixel;
use serde::Serialize;

/// Number of buckets per table.
pub const BUCKETS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistogramChannel {
    Red,
    Green,
    Blue,
    Intensity,
}

impl HistogramChannel {
    pub const ALL: [HistogramChannel; 4] = [
        HistogramChannel::Red,
        HistogramChannel::Green,
        HistogramChannel::Blue,
        HistogramChannel::Intensity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HistogramChannel::Red => "red",
            HistogramChannel::Green => "green",
            HistogramChannel::Blue => "blue",
            HistogramChannel::Intensity => "intensity",
        }
    }
}

/// Four tables of [`BUCKETS`] counts each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Histogram {
    pub red: Vec<u64>,
    pub green: Vec<u64>,
    pub blue: Vec<u64>,
    pub intensity: Vec<u64>,
}

#[inline]
fn bucket(value: u32) -> usize {
    value.min(CHANNEL_MAX) as usize
}

impl Histogram {
    pub fn from_pixels(pixels: &[Pixel]) -> Self {
        let mut h = Self {
            red: vec![0; BUCKETS],
            green: vec![0; BUCKETS],
            blue: vec![0; BUCKETS],
            intensity: vec![0; BUCKETS],
        };
        for &p in pixels {
            h.red[bucket(p.red())] += 1;
            h.green[bucket(p.green())] += 1;
            h.blue[bucket(p.blue())] += 1;
            h.intensity[bucket(intensity(p))] += 1;
        }
        h
    }

    pub fn channel(&self, channel: HistogramChannel) -> &[u64] {
        match channel {
            HistogramChannel::Red => &self.red,
            HistogramChannel::Green => &self.green,
            HistogramChannel::Blue => &self.blue,
            HistogramChannel::Intensity => &self.intensity,
        }
    }

    /// Sum of all buckets; equals the pixel count for every channel.
    pub fn total(&self, channel: HistogramChannel) -> u64 {
        self.channel(channel).iter().sum()
    }

    /// Most frequent value and its count. Ties resolve to the lowest value.
    pub fn peak(&self, channel: HistogramChannel) -> (usize, u64) {
        self.channel(channel)
            .iter()
            .copied()
            .enumerate()
            .fold((0, 0), |best, (value, count)| {
                if count > best.1 { (value, count) } else { best }
            })
    }

    /// Count-weighted mean value, or `None` for an empty table.
    pub fn mean(&self, channel: HistogramChannel) -> Option<f64> {
        let total = self.total(channel);
        if total == 0 {
            return None;
        }
        let weighted: u64 = self
            .channel(channel)
            .iter()
            .enumerate()
            .map(|(value, &count)| value as u64 * count)
            .sum();
        Some(weighted as f64 / total as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_image;

    #[test]
    fn totals_equal_pixel_count() {
        let img = sample_image();
        let h = img.histogram();
        for channel in HistogramChannel::ALL {
            assert_eq!(h.total(channel), 9, "{}", channel.name());
            assert_eq!(h.channel(channel).len(), BUCKETS);
        }
    }

    #[test]
    fn counts_land_in_the_right_buckets() {
        let pixels = [
            Pixel::rgb(0, 10, 255),
            Pixel::rgb(0, 20, 255),
            Pixel::rgb(7, 10, 1),
        ];
        let h = Histogram::from_pixels(&pixels);
        assert_eq!(h.red[0], 2);
        assert_eq!(h.red[7], 1);
        assert_eq!(h.green[10], 2);
        assert_eq!(h.blue[255], 2);
        // (0 + 10 + 255) / 3 = 88.33 → 88; (0 + 20 + 255) / 3 = 91.67 → 91; 18 / 3 = 6
        assert_eq!(h.intensity[88], 1);
        assert_eq!(h.intensity[91], 1);
        assert_eq!(h.intensity[92], 0);
        assert_eq!(h.intensity[6], 1);
    }

    #[test]
    fn oversized_channels_fall_into_top_bucket() {
        let pixels = [Pixel::new(300, 0, 0).unwrap()];
        let h = Histogram::from_pixels(&pixels);
        assert_eq!(h.red[255], 1);
        assert_eq!(h.intensity[100], 1);
    }

    #[test]
    fn peak_and_mean() {
        let pixels = [Pixel::rgb(4, 0, 0), Pixel::rgb(4, 0, 0), Pixel::rgb(10, 0, 0)];
        let h = Histogram::from_pixels(&pixels);
        assert_eq!(h.peak(HistogramChannel::Red), (4, 2));
        assert_eq!(h.mean(HistogramChannel::Red), Some(6.0));
        assert_eq!(h.peak(HistogramChannel::Green), (0, 3));
    }

    #[test]
    fn mean_of_empty_histogram_is_none() {
        let h = Histogram::from_pixels(&[]);
        assert_eq!(h.mean(HistogramChannel::Blue), None);
        assert_eq!(h.peak(HistogramChannel::Blue), (0, 0));
    }
}
