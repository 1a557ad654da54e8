//! Shared test utilities for the flatgal test suite.
//!
//! Fixture builders for album images, rendered-image views and on-disk album
//! directories (album file plus real JPEG sources).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let album_file = setup_album_dir(tmp.path(), &[
//!     ImageRecord::new("a.jpg").with_tags(["x"]),
//!     ImageRecord::new("b.jpg"),
//! ]);
//! ```

use image::{ImageEncoder, RgbImage};
use std::path::{Path, PathBuf};

use crate::metadata::write_album_file;
use crate::naming::{image_page_filename, large_variant_name, thumbnail_variant_name};
use crate::render::HtmlImage;
use crate::types::{AlbumImage, ImageRecord};

// =========================================================================
// Fixture setup
// =========================================================================

/// Write a small valid JPEG with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Lay out an album under `root`: `album.txt` describing `records`, and a
/// 64x48 JPEG in `root/images/` for every record.
///
/// Returns the album file path. Sources live in `root.join("images")`.
pub fn setup_album_dir(root: &Path, records: &[ImageRecord]) -> PathBuf {
    let images = root.join("images");
    std::fs::create_dir_all(&images).unwrap();
    for record in records {
        create_test_jpeg(&images.join(&record.filename), 64, 48);
    }
    let album_file = root.join("album.txt");
    write_album_file(&album_file, records).unwrap();
    album_file
}

// =========================================================================
// In-memory builders
// =========================================================================

/// Album images named `names`, with sources under `dir` and no derived paths.
pub fn album_images(dir: &Path, names: &[&str], thumbnail_size: u32, large_size: u32) -> Vec<AlbumImage> {
    names
        .iter()
        .map(|name| AlbumImage {
            record: ImageRecord::new(*name),
            source_path: dir.join(name),
            thumbnail_size,
            large_size,
            derived: None,
        })
        .collect()
}

/// Render views for `names` as if every resize succeeded at 100/600 and
/// originals were not installed.
pub fn html_images(names: &[&str]) -> Vec<HtmlImage> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| HtmlImage {
            index,
            filename: name.to_string(),
            description: String::new(),
            thumb_url: thumbnail_variant_name(name, 100).ok(),
            large_url: large_variant_name(name, 600).ok(),
            original_url: None,
            page_url: image_page_filename(index),
        })
        .collect()
}

/// Filenames of `dir`'s entries, sorted.
pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
