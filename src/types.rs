//! Shared record types used across the pipeline.
//!
//! An [`ImageRecord`] is what the album file says about one image. Once an
//! album loads it, the record is wrapped in an [`AlbumImage`] carrying the
//! source path and target sizes; the resize phase fills in [`DerivedPaths`]
//! and nothing mutates the image after that.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One block of an album file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Source image filename, relative to the album's image directory.
    pub filename: String,
    /// Free text shown on the image page. Empty when the block has none.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Tags in file order. Duplicates are kept as written.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ImageRecord {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Paths of the two derived rasters for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedPaths {
    pub thumbnail_path: PathBuf,
    pub thumbnail_filename: String,
    pub large_path: PathBuf,
    pub large_filename: String,
}

/// An image record as loaded into an album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumImage {
    pub record: ImageRecord,
    /// `image_dir/filename`, fixed at load time.
    pub source_path: PathBuf,
    /// Thumbnail edge (pixels) or scale (percent), copied from the album config.
    pub thumbnail_size: u32,
    /// Longest edge (pixels) or scale (percent), copied from the album config.
    pub large_size: u32,
    /// Filled by the resize phase. `None` when the transform failed.
    pub derived: Option<DerivedPaths>,
}

impl AlbumImage {
    pub fn filename(&self) -> &str {
        &self.record.filename
    }
}
