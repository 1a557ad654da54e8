//! Centralized output filename rules.
//!
//! Every file the build writes is named by a pure function of its inputs, so
//! the same album always lands on the same paths and per-record outputs never
//! collide:
//!
//! | Output | Name |
//! |---|---|
//! | Large variant | `{stem}_{size}.{ext}` (`photo.jpg` → `photo_600.jpg`) |
//! | Thumbnail | `{stem}_{size}_{size}.{ext}` (`photo.jpg` → `photo_100_100.jpg`) |
//! | Album page 1 | `index.html` |
//! | Album page N | `page-N.html` |
//! | Image page | `image-K.html`, K = 0-based index into the chosen images |
//! | Archive | `{album name}.zip` |
//!
//! Source filenames must contain exactly one `.`. Names like `photo.v2.jpg`
//! are rejected rather than guessed at.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error("invalid image filename {0:?}: expected exactly one '.' separating name and extension")]
    InvalidFilename(String),
}

/// A source filename split at its single dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitName<'a> {
    pub stem: &'a str,
    pub extension: &'a str,
}

/// Split `filename` into stem and extension.
///
/// - `"photo.jpg"` → stem `"photo"`, extension `"jpg"`
/// - `"photo"` → error (no dot)
/// - `"photo.v2.jpg"` → error (two dots)
pub fn split_filename(filename: &str) -> Result<SplitName<'_>, NamingError> {
    if filename.matches('.').count() != 1 {
        return Err(NamingError::InvalidFilename(filename.to_string()));
    }
    match filename.rsplit_once('.') {
        Some((stem, extension)) => Ok(SplitName { stem, extension }),
        None => Err(NamingError::InvalidFilename(filename.to_string())),
    }
}

/// Filename of the display-size variant.
pub fn large_variant_name(filename: &str, size: u32) -> Result<String, NamingError> {
    let SplitName { stem, extension } = split_filename(filename)?;
    Ok(format!("{stem}_{size}.{extension}"))
}

/// Filename of the square thumbnail variant.
pub fn thumbnail_variant_name(filename: &str, size: u32) -> Result<String, NamingError> {
    let SplitName { stem, extension } = split_filename(filename)?;
    Ok(format!("{stem}_{size}_{size}.{extension}"))
}

/// Filename of album page `page` (1-based).
pub fn album_page_filename(page: usize) -> String {
    if page <= 1 {
        "index.html".to_string()
    } else {
        format!("page-{page}.html")
    }
}

/// Filename of the image page for the image at `index` (0-based) in the chosen images.
pub fn image_page_filename(index: usize) -> String {
    format!("image-{index}.html")
}

/// Filename of the album archive. Path separators in the album name become
/// `_` so the archive always lands in the install directory itself.
pub fn archive_filename(album_name: &str) -> String {
    format!("{}.zip", album_name.replace(['/', '\\'], "_"))
}

/// Percent-encode one filename for use as a relative `href`/`src`.
pub fn url_component(name: &str) -> String {
    urlencoding::encode(name).into_owned()
}

/// Percent-encode each `/`-separated part of a relative path.
pub fn url_path(path: &str) -> String {
    path.split('/').map(url_component).collect::<Vec<_>>().join("/")
}

/// Link from an album installed `depth` directories below the gallery root
/// back to the gallery index.
pub fn gallery_index_url(depth: usize) -> String {
    format!("{}index.html", "../".repeat(depth))
}
