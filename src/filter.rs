//! Tag selection.
//!
//! An empty wanted-tag list selects everything. Otherwise a record is kept
//! when it carries at least one of the wanted tags (exact, case-sensitive
//! match). Kept records stay in input order, so the chosen images are always
//! a subsequence of the parsed ones.

use crate::types::{AlbumImage, ImageRecord};

/// Anything that carries tags.
pub trait Tagged {
    fn tags(&self) -> &[String];
}

impl Tagged for ImageRecord {
    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Tagged for AlbumImage {
    fn tags(&self) -> &[String] {
        &self.record.tags
    }
}

/// Whether `item` passes the tag filter.
pub fn matches<T: Tagged>(item: &T, wanted: &[String]) -> bool {
    wanted.is_empty() || item.tags().iter().any(|tag| wanted.contains(tag))
}

/// Select the records to build. An empty result is valid.
pub fn select<T: Tagged + Clone>(records: &[T], wanted: &[String]) -> Vec<T> {
    if wanted.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| matches(*r, wanted))
        .cloned()
        .collect()
}

/// Split a comma-separated tag list, trimming and dropping empty pieces.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
