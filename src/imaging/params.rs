//! Parameter types for image operations.
//!
//! These structs describe *what* to produce, not *how*. They are the interface
//! between the [`operations`](super::operations) layer (which decides whether a
//! variant needs producing at all) and the [`backend`](super::backend) (which
//! does the pixel work), so a mock backend can stand in during tests.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Quality setting for lossy encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// How configured variant sizes are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeMode {
    /// Thumbnail edge and large longest edge in pixels.
    #[default]
    Pixels,
    /// Both variants scaled to a percentage of the source. Thumbnails are not cropped.
    Percent,
}

/// Square thumbnail: orient, fill, center-crop.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub size: u32,
    pub mode: SizeMode,
    pub quality: Quality,
}

/// Display-size variant: orient, shrink to fit if needed.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub size: u32,
    pub mode: SizeMode,
    pub quality: Quality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn size_mode_defaults_to_pixels() {
        assert_eq!(SizeMode::default(), SizeMode::Pixels);
    }
}
