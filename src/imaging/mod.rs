//! Pixel engine and codecs.
//!
//! | Concern | Where |
//! |---|---|
//! | **RGB sample** | [`Pixel`] |
//! | **Grid + transforms** | [`Image`]: flips, brighten, components, greyscale, sepia, blur, sharpen |
//! | **Histogram** | [`Histogram`] |
//! | **PPM text** | [`ppm`] reader/writer |
//! | **PNG / JPEG / BMP** | `image` crate via [`RustBackend`] |
//!
//! The module is split into:
//! - **Calculations**: Pure per-pixel functions (unit testable)
//! - **Parameters**: Components, colour matrices, kernels, overflow policy
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
pub mod histogram;
pub mod image;
mod params;
pub mod pixel;
pub mod ppm;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend, ImageFormat};
pub use histogram::{Histogram, HistogramChannel};
pub use self::image::{Image, ImageError};
pub use params::{ColorMatrix, Component, Kernel, SepiaOverflow};
pub use pixel::Pixel;
pub use ppm::PpmOptions;
pub use rust_backend::RustBackend;
