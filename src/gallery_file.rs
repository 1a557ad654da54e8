//! Gallery description file parsing.
//!
//! A gallery file lists albums as blocks of `key = value` lines:
//!
//! ```text
//! # Summer trips
//! album-name   = Beach
//! album-dir    = photos/beach
//! album-subdir = beach
//! album-file   = photos/beach/album.txt
//! album-tags   = best, family
//!
//! album-name   = Mountains
//! album-dir    = photos/mountains
//! album-subdir = mountains
//! album-file   = photos/mountains/album.txt
//! ```
//!
//! | Key | Required | Meaning |
//! |---|---|---|
//! | `album-name` | yes | Display name; also names the archive |
//! | `album-dir` | yes | Directory holding the source images |
//! | `album-subdir` | yes | Install subdirectory under the gallery root |
//! | `album-file` | yes | The album's metadata file |
//! | `album-tags` | no | Comma-separated tag filter |
//!
//! A second `album-name` starts the next album; blank lines and `#` comments
//! are ignored and carry no structure. Relative `album-dir` / `album-file`
//! paths resolve against the gallery file's own directory. Unknown keys,
//! repeated keys within one album, and lines without `=` are errors naming the
//! line. A block missing a required key is reported when the block closes.

use crate::filter::parse_tag_list;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryFileError {
    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}:{line}: {reason}: {content:?}", path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        content: String,
        reason: &'static str,
    },
    #[error("{}:{line}: unknown key {key:?}", path.display())]
    UnknownKey {
        path: PathBuf,
        line: usize,
        key: String,
    },
    #[error("{}:{line}: album {album:?} is missing required key {key}", path.display())]
    MissingKey {
        path: PathBuf,
        /// Line where the incomplete block started.
        line: usize,
        album: String,
        key: &'static str,
    },
}

/// One album as described by the gallery file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumSpec {
    pub name: String,
    pub image_dir: PathBuf,
    pub subdir: String,
    pub album_file: PathBuf,
    pub tags: Vec<String>,
    /// First line of the block, for error messages.
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Name,
    Dir,
    Subdir,
    File,
    Tags,
}

impl Key {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "album-name" => Some(Key::Name),
            "album-dir" => Some(Key::Dir),
            "album-subdir" => Some(Key::Subdir),
            "album-file" => Some(Key::File),
            "album-tags" => Some(Key::Tags),
            _ => None,
        }
    }
}

#[derive(Default)]
struct PendingAlbum {
    start_line: usize,
    name: Option<String>,
    dir: Option<String>,
    subdir: Option<String>,
    file: Option<String>,
    tags: Option<String>,
}

impl PendingAlbum {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.dir.is_none()
            && self.subdir.is_none()
            && self.file.is_none()
            && self.tags.is_none()
    }

    fn slot(&mut self, key: Key) -> &mut Option<String> {
        match key {
            Key::Name => &mut self.name,
            Key::Dir => &mut self.dir,
            Key::Subdir => &mut self.subdir,
            Key::File => &mut self.file,
            Key::Tags => &mut self.tags,
        }
    }

    fn finish(self, origin: &Path, base_dir: &Path) -> Result<AlbumSpec, GalleryFileError> {
        let album = self.name.clone().unwrap_or_default();
        let missing = |key: &'static str| GalleryFileError::MissingKey {
            path: origin.to_path_buf(),
            line: self.start_line,
            album: album.clone(),
            key,
        };
        let name = self.name.clone().ok_or_else(|| missing("album-name"))?;
        let dir = self.dir.clone().ok_or_else(|| missing("album-dir"))?;
        let subdir = self.subdir.clone().ok_or_else(|| missing("album-subdir"))?;
        let file = self.file.clone().ok_or_else(|| missing("album-file"))?;

        Ok(AlbumSpec {
            name,
            image_dir: base_dir.join(dir),
            subdir,
            album_file: base_dir.join(file),
            tags: self.tags.as_deref().map(parse_tag_list).unwrap_or_default(),
            line: self.start_line,
        })
    }
}

/// Parse a gallery file from disk.
pub fn parse_gallery_file(path: &Path) -> Result<Vec<AlbumSpec>, GalleryFileError> {
    let file = File::open(path).map_err(|source| GalleryFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or(Path::new(""));
    parse_gallery(BufReader::new(file), path, base_dir)
}

/// Parse gallery content. `origin` is used in errors; relative paths resolve against `base_dir`.
pub fn parse_gallery(
    reader: impl BufRead,
    origin: &Path,
    base_dir: &Path,
) -> Result<Vec<AlbumSpec>, GalleryFileError> {
    let mut albums = Vec::new();
    let mut pending = PendingAlbum::default();

    for (idx, raw) in reader.lines().enumerate() {
        let raw = raw.map_err(|source| GalleryFileError::Io {
            path: origin.to_path_buf(),
            source,
        })?;
        let line_no = idx + 1;
        let line = raw.trim();
        let malformed = |reason: &'static str| GalleryFileError::Malformed {
            path: origin.to_path_buf(),
            line: line_no,
            content: raw.clone(),
            reason,
        };

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            return Err(malformed("expected `key = value`"));
        };
        let (raw_key, value) = (raw_key.trim(), raw_value.trim());
        let key = Key::parse(raw_key).ok_or_else(|| GalleryFileError::UnknownKey {
            path: origin.to_path_buf(),
            line: line_no,
            key: raw_key.to_string(),
        })?;

        if key != Key::Tags && value.is_empty() {
            return Err(malformed("value must not be empty"));
        }
        if key == Key::Subdir && !is_plain_relative(value) {
            return Err(malformed("album-subdir must be a relative path inside the gallery"));
        }

        if key == Key::Name && pending.name.is_some() {
            let done = std::mem::take(&mut pending);
            albums.push(done.finish(origin, base_dir)?);
        }
        if pending.is_empty() {
            pending.start_line = line_no;
        }

        let slot = pending.slot(key);
        if slot.is_some() {
            return Err(malformed("key repeated within one album"));
        }
        *slot = Some(value.to_string());
    }

    if !pending.is_empty() {
        albums.push(pending.finish(origin, base_dir)?);
    }

    Ok(albums)
}

fn is_plain_relative(subdir: &str) -> bool {
    let mut components = Path::new(subdir).components();
    components
        .clone()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && components.any(|c| matches!(c, Component::Normal(_)))
}
