//! Build configuration.
//!
//! Settings come in three layers, each overriding the one before:
//!
//! 1. stock defaults (`BuildConfig::default()`)
//! 2. an optional user TOML file (`--config path/to/flatgal.toml`)
//! 3. command-line overrides, expressed as a sparse TOML table
//!
//! The merged table is deserialized once and validated, and the resulting
//! [`BuildConfig`] is passed down explicitly to every phase of a build.
//!
//! ## Options
//!
//! ```toml
//! [images]
//! thumbnail_size = 150      # Square thumbnail edge, in pixels
//! large_size = 1024         # Longest edge of the display image, in pixels
//! size_mode = "pixels"      # "pixels" or "percent" of the source dimensions
//! quality = 90              # JPEG quality (1-100)
//!
//! [pages]
//! page_size = 50            # Thumbnails per album page
//!
//! [processing]
//! workers = 4               # Parallel resize workers per album
//!
//! [output]
//! include_originals = true  # Copy source images into the install directory
//! include_archive = false   # Write {album}.zip with every chosen original
//!
//! [force]
//! images = false            # Regenerate variants even if they exist
//! html = false              # Rewrite pages even if they exist
//! archive = false           # Rewrite the archive even if it exists
//! ```
//!
//! Config files are sparse; override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::imaging::{Quality, SizeMode};
use crate::resize::ResizeSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Everything a build needs to know besides its inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub images: ImagesConfig,
    pub pages: PagesConfig,
    pub processing: ProcessingConfig,
    pub output: OutputConfig,
    pub force: ForceConfig,
}

impl BuildConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let images = &self.images;
        if images.thumbnail_size == 0 || images.large_size == 0 {
            return Err(ConfigError::Validation(
                "images.thumbnail_size and images.large_size must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&images.quality) {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if images.size_mode == SizeMode::Percent
            && (images.thumbnail_size > 100 || images.large_size > 100)
        {
            return Err(ConfigError::Validation(
                "percent sizes must not exceed 100".into(),
            ));
        }
        if self.pages.page_size == 0 {
            return Err(ConfigError::Validation(
                "pages.page_size must be at least 1".into(),
            ));
        }
        if self.processing.workers == 0 {
            return Err(ConfigError::Validation(
                "processing.workers must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Settings for the resize phase of one album.
    pub fn resize_settings(&self) -> ResizeSettings {
        ResizeSettings {
            mode: self.images.size_mode,
            quality: Quality::new(self.images.quality),
            workers: self.processing.workers,
            force: self.force.images,
        }
    }
}

/// Variant sizes and encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    pub thumbnail_size: u32,
    pub large_size: u32,
    /// How the two sizes are read: absolute pixels or percent of the source.
    pub size_mode: SizeMode,
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            thumbnail_size: 150,
            large_size: 1024,
            size_mode: SizeMode::Pixels,
            quality: 90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagesConfig {
    pub page_size: usize,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self { page_size: 50 }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Number of resize workers. Each album gets its own pool of this size.
    pub workers: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self { workers: 4 }
    }
}

/// Optional outputs next to the pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub include_originals: bool,
    pub include_archive: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            include_originals: true,
            include_archive: false,
        }
    }
}

/// Per-output regeneration switches. Everything is cached by existence
/// unless its switch is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForceConfig {
    pub images: bool,
    pub html: bool,
    pub archive: bool,
}

impl ForceConfig {
    /// All three switches on.
    pub fn all() -> Self {
        Self {
            images: true,
            html: true,
            archive: true,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that user files and CLI overrides merge onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(BuildConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables are merged key by key. Any other overlay value replaces the base
/// value entirely. Base keys missing from the overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Unlike a missing default location, an explicitly named file must exist.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<BuildConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BuildConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Build the effective config: stock defaults, then `file`, then `cli`.
pub fn load_config(
    file: Option<&Path>,
    cli: Option<toml::Value>,
) -> Result<BuildConfig, ConfigError> {
    let mut base = stock_defaults_value()?;
    if let Some(path) = file {
        tracing::debug!(path = %path.display(), "loading config file");
        base = merge_toml(base, load_raw_config(path)?);
    }
    resolve_config(base, cli)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# flatgal configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.
#
# Pass this file with `flatgal --config flatgal.toml <command>`.
# Command-line flags override values from this file.

# ---------------------------------------------------------------------------
# Image variants
# ---------------------------------------------------------------------------
[images]
# Square thumbnail edge in pixels. The source is scaled so its shorter side
# matches, then center-cropped.
thumbnail_size = 150

# Longest edge of the display image in pixels. Smaller sources are kept as-is.
large_size = 1024

# "pixels": the sizes above are pixel counts.
# "percent": both sizes are a percentage (1-100) of the source dimensions and
# thumbnails are scaled proportionally instead of cropped.
size_mode = "pixels"

# JPEG encoding quality (1 = worst, 100 = best).
quality = 90

# ---------------------------------------------------------------------------
# Album pages
# ---------------------------------------------------------------------------
[pages]
# Thumbnails per album page. Page 1 is index.html, then page-2.html, ...
page_size = 50

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Parallel resize workers for each album.
workers = 4

# ---------------------------------------------------------------------------
# Optional outputs
# ---------------------------------------------------------------------------
[output]
# Copy each chosen source image into the album directory and link it from
# the image page.
include_originals = true

# Write {album name}.zip holding every chosen original.
include_archive = false

# ---------------------------------------------------------------------------
# Regeneration
# ---------------------------------------------------------------------------
# Outputs that already exist are left alone unless forced here.
[force]
images = false
html = false
archive = false
"##
}
