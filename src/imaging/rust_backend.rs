//! Pure Rust codec backend.
//!
//! ## Format mapping
//!
//! | Format | Decode | Encode |
//! |---|---|---|
//! | PPM (`P3`) | [`ppm::read_ppm`] | [`ppm::write_ppm`] |
//! | PNG | `image::ImageReader` | `RgbImage::save_with_format` |
//! | JPEG | `image::ImageReader` | `JpegEncoder::new_with_quality` |
//! | BMP | `image::ImageReader` | `RgbImage::save_with_format` |
//!
//! Binary formats are decoded to 8-bit RGB (alpha is dropped). On encode,
//! channels above 255 are saturated since the target is 8-bit.

use super::backend::{BackendError, ImageBackend, ImageFormat};
use super::image::Image;
use super::pixel::Pixel;
use super::ppm::{self, PpmOptions};
use image::{ImageReader, RgbImage};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

/// Default JPEG quality (1–100).
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Codec backend built on [`ppm`] and the `image` crate.
#[derive(Debug, Clone)]
pub struct RustBackend {
    ppm: PpmOptions,
    jpeg_quality: u8,
}

impl RustBackend {
    pub fn new() -> Self {
        Self {
            ppm: PpmOptions::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    pub fn with_ppm_options(mut self, options: PpmOptions) -> Self {
        self.ppm = options;
        self
    }

    /// Quality is clamped to `1..=100`.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn from_rgb_image(rgb: &RgbImage) -> Result<Image, BackendError> {
    let pixels = rgb.pixels().map(|p| Pixel::rgb(p[0], p[1], p[2])).collect();
    Ok(Image::from_pixels(
        rgb.width() as usize,
        rgb.height() as usize,
        pixels,
    )?)
}

fn to_rgb_image(image: &Image) -> Result<RgbImage, BackendError> {
    let raw: Vec<u8> = image
        .pixels()
        .iter()
        .flat_map(|p| p.channels().map(|c| c.min(255) as u8))
        .collect();
    let (width, height) = (
        u32::try_from(image.width()).map_err(|_| BackendError::Encode("image too wide".into()))?,
        u32::try_from(image.height()).map_err(|_| BackendError::Encode("image too tall".into()))?,
    );
    RgbImage::from_raw(width, height, raw)
        .ok_or_else(|| BackendError::Encode("pixel buffer does not match dimensions".into()))
}

fn decode_binary(path: &Path) -> Result<Image, BackendError> {
    let decoded = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| BackendError::Decode(format!("{}: {e}", path.display())))?;
    from_rgb_image(&decoded.to_rgb8())
}

fn encode_jpeg(rgb: &RgbImage, path: &Path, quality: u8) -> Result<(), BackendError> {
    let writer = BufWriter::new(File::create(path)?);
    image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality)
        .encode_image(rgb)
        .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {e}")))
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<Image, BackendError> {
        let format = ImageFormat::from_path(path)?;
        let image = match format {
            ImageFormat::Ppm => ppm::read_ppm(BufReader::new(File::open(path)?))?,
            ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Bmp => decode_binary(path)?,
        };
        debug!(
            path = %path.display(),
            ?format,
            width = image.width(),
            height = image.height(),
            "decoded image"
        );
        Ok(image)
    }

    fn encode(&self, image: &Image, path: &Path) -> Result<(), BackendError> {
        let format = ImageFormat::from_path(path)?;
        match format {
            ImageFormat::Ppm => {
                ppm::write_ppm(image, BufWriter::new(File::create(path)?), &self.ppm)?
            }
            ImageFormat::Jpeg => encode_jpeg(&to_rgb_image(image)?, path, self.jpeg_quality)?,
            ImageFormat::Png => to_rgb_image(image)?
                .save_with_format(path, image::ImageFormat::Png)
                .map_err(|e| BackendError::Encode(format!("PNG encode failed: {e}")))?,
            ImageFormat::Bmp => to_rgb_image(image)?
                .save_with_format(path, image::ImageFormat::Bmp)
                .map_err(|e| BackendError::Encode(format!("BMP encode failed: {e}")))?,
        }
        debug!(path = %path.display(), ?format, "encoded image");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{image_from_rows, sample_image, setup_fixtures};

    fn gradient(width: usize, height: usize) -> Image {
        let pixels = (0..width * height)
            .map(|i| Pixel::rgb((i % 256) as u8, (i * 7 % 256) as u8, 128))
            .collect();
        Image::from_pixels(width, height, pixels).unwrap()
    }

    #[test]
    fn decodes_fixture_with_comments() {
        let (_tmp, path) = setup_fixtures();
        assert_eq!(RustBackend::new().decode(&path).unwrap(), sample_image());
    }

    #[test]
    fn ppm_round_trip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("sample.ppm");
        let backend = RustBackend::new();

        backend.encode(&sample_image(), &path).unwrap();
        assert_eq!(backend.decode(&path).unwrap(), sample_image());
    }

    #[test]
    fn png_round_trip_is_lossless() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("gradient.png");
        let backend = RustBackend::new();
        let original = gradient(40, 30);

        backend.encode(&original, &path).unwrap();
        assert_eq!(backend.decode(&path).unwrap(), original);
    }

    #[test]
    fn bmp_round_trip_is_lossless() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("gradient.bmp");
        let backend = RustBackend::new();
        let original = gradient(17, 9);

        backend.encode(&original, &path).unwrap();
        assert_eq!(backend.decode(&path).unwrap(), original);
    }

    #[test]
    fn jpeg_round_trip_keeps_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("gradient.jpg");
        let backend = RustBackend::new().with_jpeg_quality(85);

        backend.encode(&gradient(64, 48), &path).unwrap();
        let decoded = backend.decode(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[test]
    fn encode_saturates_oversized_channels() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("big.png");
        let img = Image::new(vec![vec![Pixel::new(300, 10, 20).unwrap()]]).unwrap();

        RustBackend::new().encode(&img, &path).unwrap();
        let decoded = RustBackend::new().decode(&path).unwrap();
        assert_eq!(decoded, image_from_rows(&[&[(255, 10, 20)]]));
    }

    #[test]
    fn ppm_options_are_applied() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("plain.ppm");
        let backend = RustBackend::new().with_ppm_options(PpmOptions {
            comment: "hello".into(),
            max_value: 255,
        });

        backend.encode(&image_from_rows(&[&[(1, 2, 3)]]), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("P3\n# hello\n1 1\n255\n"), "{text}");
    }

    #[test]
    fn decode_nonexistent_file_errors() {
        let err = RustBackend::new()
            .decode(Path::new("/nonexistent/image.ppm"))
            .unwrap_err();
        assert!(matches!(err, BackendError::Io(_)));
    }

    #[test]
    fn decode_garbage_png_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("garbage.png");
        std::fs::write(&path, b"not a png").unwrap();
        let err = RustBackend::new().decode(&path).unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)), "{err}");
    }

    #[test]
    fn unsupported_extension_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = RustBackend::new()
            .encode(&sample_image(), &tmp.path().join("out.tiff"))
            .unwrap_err();
        assert!(matches!(err, BackendError::UnsupportedFormat(_)));
    }

    #[test]
    fn jpeg_quality_is_clamped() {
        assert_eq!(RustBackend::new().with_jpeg_quality(0).jpeg_quality, 1);
        assert_eq!(RustBackend::new().with_jpeg_quality(200).jpeg_quality, 100);
    }
}
