//! Tool configuration.
//!
//! Handles loading and validating `imgscript.toml`. Every key has a default,
//! so a user file names only the keys it changes.
//!
//! ## Config File Location
//!
//! The path comes from `--config` and defaults to `./imgscript.toml`. A missing
//! file is not an error: the stock defaults apply.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [ppm]
//! comment = "Created by imgscript"  # Written after the P3 magic ("" = none)
//! max_value = 255                   # Header max channel value (1-255)
//!
//! [jpeg]
//! quality = 90                      # JPEG encoding quality (1-100)
//!
//! [filters]
//! sepia_overflow = "skip"           # "skip" or "clamp"
//!
//! [script]
//! echo = false                      # Echo each script line before running it
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{PpmOptions, RustBackend, SepiaOverflow};
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "imgscript.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `imgscript.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Plain PPM writer settings.
    pub ppm: PpmConfig,
    /// JPEG encoder settings.
    pub jpeg: JpegConfig,
    /// Filter behaviour.
    pub filters: FiltersConfig,
    /// Script interpreter settings.
    pub script: ScriptConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PpmConfig {
    pub comment: String,
    pub max_value: u32,
}

impl Default for PpmConfig {
    fn default() -> Self {
        let stock = PpmOptions::default();
        Self {
            comment: stock.comment,
            max_value: stock.max_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JpegConfig {
    pub quality: u8,
}

impl Default for JpegConfig {
    fn default() -> Self {
        Self {
            quality: crate::imaging::rust_backend::DEFAULT_JPEG_QUALITY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FiltersConfig {
    /// What sepia does when a channel would exceed 255.
    pub sepia_overflow: SepiaOverflow,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptConfig {
    pub echo: bool,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=255).contains(&self.ppm.max_value) {
            return Err(ConfigError::Validation(
                "ppm.max_value must be 1-255".into(),
            ));
        }
        if !(1..=100).contains(&self.jpeg.quality) {
            return Err(ConfigError::Validation(
                "jpeg.quality must be 1-100".into(),
            ));
        }
        if self.ppm.comment.contains('\n') {
            return Err(ConfigError::Validation(
                "ppm.comment must be a single line".into(),
            ));
        }
        Ok(())
    }

    pub fn ppm_options(&self) -> PpmOptions {
        PpmOptions {
            comment: self.ppm.comment.clone(),
            max_value: self.ppm.max_value,
        }
    }

    /// Codec backend carrying the PPM and JPEG settings.
    pub fn backend(&self) -> RustBackend {
        RustBackend::new()
            .with_ppm_options(self.ppm_options())
            .with_jpeg_quality(self.jpeg.quality)
    }

    /// Empty registry wired to [`Config::backend`] and the sepia policy.
    pub fn registry(&self) -> Registry<RustBackend> {
        Registry::with_backend(self.backend()).with_sepia_overflow(self.filters.sepia_overflow)
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse config text. Missing keys take their defaults.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from the file at `path`.
///
/// A missing file yields the stock defaults. Unknown keys are rejected
/// and the result is validated.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    parse_config(&fs::read_to_string(path)?)
}

/// Returns a fully-commented stock `imgscript.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imgscript Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Plain PPM (P3) output
# ---------------------------------------------------------------------------
[ppm]
# Comment line written after the P3 magic. Set to "" to omit it.
comment = "Created by imgscript"

# Max channel value written in the header (1-255).
# Saving fails if any channel exceeds it.
max_value = 255

# ---------------------------------------------------------------------------
# JPEG output
# ---------------------------------------------------------------------------
[jpeg]
# Encoding quality (1 = worst, 100 = best).
quality = 90

# ---------------------------------------------------------------------------
# Filters
# ---------------------------------------------------------------------------
[filters]
# What sepia does when a channel of the toned pixel would exceed 255:
#   "skip"  - leave that pixel unchanged
#   "clamp" - clamp each channel to 255
sepia_overflow = "skip"

# ---------------------------------------------------------------------------
# Script interpreter
# ---------------------------------------------------------------------------
[script]
# Echo each script line before executing it.
echo = false
"##
}
