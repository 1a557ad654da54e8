//! Album file parsing and writing.
//!
//! An album file lists images, one block per image, blocks separated by
//! blank lines:
//!
//! ```text
//! # comments are ignored anywhere
//! IMG_0001.jpg
//! A dog on the beach
//! Tag: dogs, beach
//! Tag: summer
//!
//! IMG_0002.jpg
//! Tag: beach
//! ```
//!
//! - The first non-blank, non-comment line of a block is the filename.
//! - The line right after the filename is the description, unless it is a
//!   `Tag: ` line. A block has at most one description.
//! - Any number of `Tag: ` lines follow. Their remainder is split on commas,
//!   trimmed, and empty pieces are dropped.
//! - A blank line ends the block. Extra blank lines are harmless, and the last
//!   block does not need a trailing blank line.
//!
//! Anything else (a second description, a description after tags) is a hard
//! error naming the line. There is no escaping: a filename or description
//! that is empty, starts with `#`, or starts with `Tag: ` cannot be written.
//!
//! Only filename, description and tags are read here, so the parser is usable
//! on its own (see [`crate::merge`]); albums fill in paths and sizes.

use crate::types::ImageRecord;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

const TAG_PREFIX: &str = "Tag:";

#[derive(Error, Debug)]
pub enum MetadataError {
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
}

/// Where the parser is within the current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    /// No filename collected yet.
    Between,
    /// Filename seen; description or tags may follow.
    AfterFilename,
    /// Description seen; only tags may follow.
    AfterDescription,
    /// At least one tag line seen.
    InTags,
}

#[derive(Default)]
struct PendingRecord {
    filename: String,
    description: String,
    tags: Vec<String>,
}

impl PendingRecord {
    fn flush(&mut self, out: &mut Vec<ImageRecord>) {
        let pending = std::mem::take(self);
        out.push(ImageRecord {
            filename: pending.filename,
            description: pending.description,
            tags: pending.tags,
        });
    }
}

/// Parse an album file from disk.
pub fn parse_album_file(path: &Path) -> Result<Vec<ImageRecord>, MetadataError> {
    let file = File::open(path).map_err(|source| MetadataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_album(BufReader::new(file), path)
}

/// Parse album file content from any reader. `origin` is used in errors only.
pub fn parse_album(reader: impl BufRead, origin: &Path) -> Result<Vec<ImageRecord>, MetadataError> {
    let mut records = Vec::new();
    let mut pending = PendingRecord::default();
    let mut state = BlockState::Between;

    for (idx, raw) in reader.lines().enumerate() {
        let raw = raw.map_err(|source| MetadataError::Io {
            path: origin.to_path_buf(),
            source,
        })?;
        let line = raw.trim();
        let malformed = |reason| MetadataError::Malformed {
            path: origin.to_path_buf(),
            line: idx + 1,
            content: raw.clone(),
            reason,
        };

        if line.starts_with('#') {
            continue;
        }

        if line.is_empty() {
            if state != BlockState::Between {
                pending.flush(&mut records);
                state = BlockState::Between;
            }
            continue;
        }

        let tags = parse_tag_line(line);

        state = match (state, tags) {
            (BlockState::Between, Some(_)) => {
                return Err(malformed("expected a filename, found a tag line"));
            }
            (BlockState::Between, None) => {
                pending.filename = line.to_string();
                BlockState::AfterFilename
            }
            (BlockState::AfterFilename, None) => {
                pending.description = line.to_string();
                BlockState::AfterDescription
            }
            (_, Some(tags)) => {
                pending.tags.extend(tags);
                BlockState::InTags
            }
            (BlockState::AfterDescription, None) => {
                return Err(malformed("unexpected second description line"));
            }
            (BlockState::InTags, None) => {
                return Err(malformed("description must come before tag lines"));
            }
        };
    }

    if state != BlockState::Between {
        pending.flush(&mut records);
    }

    Ok(records)
}

/// Split a `Tag: a, b` line into its tags. `None` when the line is not a tag line.
fn parse_tag_line(line: &str) -> Option<Vec<String>> {
    let rest = line.strip_prefix(TAG_PREFIX)?;
    if !(rest.is_empty() || rest.starts_with(' ')) {
        return None;
    }
    Some(
        rest.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
    )
}

/// Render records in album file format. Parsing the result yields the same
/// records as long as they are representable (see the module docs).
pub fn format_album(records: &[ImageRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.filename);
        out.push('\n');
        if !record.description.is_empty() {
            out.push_str(&record.description);
            out.push('\n');
        }
        if !record.tags.is_empty() {
            out.push_str("Tag: ");
            out.push_str(&record.tags.join(", "));
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Write records to `path` in album file format, replacing any existing file.
pub fn write_album_file(path: &Path, records: &[ImageRecord]) -> io::Result<()> {
    std::fs::write(path, format_album(records))
}
