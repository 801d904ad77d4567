//! # imgscript
//!
//! A small scriptable image editor. Images are loaded from disk into a named
//! registry, transformed into new names, and written back out. Every edit is
//! copy-on-write at the registry boundary: a transform never touches its
//! source unless the destination name is the same.
//!
//! # Architecture
//!
//! ```text
//! script line ──► Command ──► Registry ──► Image transform
//!                               │
//!                   load/save   ▼
//!                            ImageBackend (PPM text, PNG, JPEG, BMP)
//! ```
//!
//! - **Images are values.** [`imaging::Image`] owns its pixels; cloning is a
//!   deep copy. Transforms mutate in place and are pure functions of the
//!   pixel data, so they are unit tested without touching the filesystem.
//! - **Commands are data.** [`command::Operation`] is a closed enum of the
//!   supported transforms, and [`command::Command`] binds one to a source and
//!   destination name. Dispatch is one `match`.
//! - **Codecs are a trait.** [`imaging::ImageBackend`] is the only place file
//!   encodings exist. Tests swap in a mock that records calls.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Pixels, the image grid and its transforms, histograms, PPM codec, `image`-crate backend |
//! | [`registry`] | Named image store with copy semantics; `SharedRegistry` for locked shared use |
//! | [`command`] | `Operation` enum, verb table, `Command` dispatch onto the registry |
//! | [`script`] | Line interpreter: `load`, `save`, transforms, `show`, `histogram`, `menu`, `quit` |
//! | [`config`] | `imgscript.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting: menu, histogram and run summaries |
//!
//! # Design Decisions
//!
//! ## Convolution Reads a Separate Buffer
//!
//! Blur and sharpen read every tap from an untouched copy of the source
//! pixels and write into a fresh buffer. Taps that fall outside the image are
//! dropped without renormalising the kernel, so edges come out darker. That
//! edge darkening is intentional and covered by tests.
//!
//! ## Sepia Overflow Is a Policy
//!
//! Sepia tone can push channels above 255. The default policy
//! ([`imaging::SepiaOverflow::Skip`]) leaves such a pixel unchanged;
//! `[filters] sepia_overflow = "clamp"` clamps each channel instead. Every
//! other transform clamps per channel.
//!
//! ## Two Luma Weightings
//!
//! The `luma` component uses Rec. 709 weights (0.2126, 0.7152, 0.0722) while
//! `greyscale` applies the colour matrix with rows (0.393, 0.769, 0.189).
//! They are kept distinct.

pub mod command;
pub mod config;
pub mod imaging;
pub mod output;
pub mod registry;
pub mod script;

#[cfg(test)]
pub(crate) mod test_helpers;
