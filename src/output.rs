//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every entity (album,
//! image) leads with its identity: positional index and name. Counts, cache
//! status and paths follow as indented context lines.
//!
//! # Output Format
//!
//! ## Resize progress
//!
//! ```text
//! Summer (3 photos)
//!     001 beach.jpg
//!         thumbnail: generated
//!         large: cached
//!     002 dog.v2.jpg
//!         failed: invalid image filename "dog.v2.jpg": ...
//! ```
//!
//! ## Album summary
//!
//! ```text
//! Summer → site/summer
//!     Images: 3 of 5 chosen
//!     Variants: 4 generated, 2 cached, 1 failed
//!     Pages: 5 written, 0 skipped
//!     Originals: 3 copied
//!     Archive: written
//! ```
//!
//! ## Check
//!
//! ```text
//! Summer (2 of 3 photos chosen)
//!     Source: photos/summer/album.txt
//!     001 beach.jpg
//!         A dog on the beach
//!         Tags: dogs, beach
//!     Warning: notes.txt: unsupported image format
//! ```
//!
//! # Architecture
//!
//! Each display has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::album::{AlbumCheck, AlbumSummary};
use crate::gallery::GallerySummary;
use crate::imaging::VariantStatus;
use crate::render::WriteStatus;
use crate::resize::ResizeEvent;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn variant_status(status: VariantStatus) -> &'static str {
    match status {
        VariantStatus::Generated => "generated",
        VariantStatus::Cached => "cached",
    }
}

fn write_status(status: WriteStatus) -> &'static str {
    match status {
        WriteStatus::Written => "written",
        WriteStatus::Skipped => "skipped",
    }
}

// ============================================================================
// Resize progress
// ============================================================================

/// Format a single resize progress event as display lines.
///
/// Event indices are 0-based positions in the chosen images; they are shown
/// 1-based like every other positional index.
pub fn format_resize_event(event: &ResizeEvent) -> Vec<String> {
    match event {
        ResizeEvent::AlbumStarted { name, image_count } => {
            vec![format!("{} ({} photos)", name, image_count)]
        }
        ResizeEvent::ImageProcessed {
            index,
            filename,
            thumbnail,
            large,
        } => vec![
            format!("{}{} {}", indent(1), format_index(index + 1), filename),
            format!("{}thumbnail: {}", indent(2), variant_status(*thumbnail)),
            format!("{}large: {}", indent(2), variant_status(*large)),
        ],
        ResizeEvent::ImageFailed {
            index,
            filename,
            error,
        } => vec![
            format!("{}{} {}", indent(1), format_index(index + 1), filename),
            format!("{}failed: {}", indent(2), error),
        ],
    }
}

// ============================================================================
// Install summaries
// ============================================================================

/// Format what one album install did.
pub fn format_album_summary(summary: &AlbumSummary) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{} \u{2192} {}",
            summary.name,
            summary.install_dir.display()
        ),
        format!(
            "{}Images: {} of {} chosen",
            indent(1),
            summary.chosen_images,
            summary.total_images
        ),
        format!("{}Variants: {}", indent(1), summary.variants),
        format!("{}Pages: {}", indent(1), summary.pages),
    ];
    if summary.originals_copied > 0 {
        lines.push(format!(
            "{}Originals: {} copied",
            indent(1),
            summary.originals_copied
        ));
    }
    if let Some(status) = summary.archive {
        lines.push(format!("{}Archive: {}", indent(1), write_status(status)));
    }
    lines
}

/// Format a gallery install: every album summary, then the index and totals.
pub fn format_gallery_summary(summary: &GallerySummary) -> Vec<String> {
    let mut lines = Vec::new();
    for (pos, album) in summary.albums.iter().enumerate() {
        let mut album_lines = format_album_summary(album).into_iter();
        if let Some(header) = album_lines.next() {
            lines.push(format!("{} {}", format_index(pos + 1), header));
        }
        lines.extend(album_lines);
    }

    let chosen: usize = summary.albums.iter().map(|a| a.chosen_images).sum();
    let failed: usize = summary.albums.iter().map(|a| a.variants.failed).sum();
    lines.push(format!("Gallery index: {}", write_status(summary.index)));
    lines.push(format!(
        "Installed {} albums, {} photos, {} failed",
        summary.albums.len(),
        chosen,
        failed
    ));
    lines
}

pub fn print_album_summary(summary: &AlbumSummary) {
    for line in format_album_summary(summary) {
        println!("{}", line);
    }
}

pub fn print_gallery_summary(summary: &GallerySummary) {
    for line in format_gallery_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the result of checking one album.
pub fn format_album_check(check: &AlbumCheck) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{} ({} of {} photos chosen)",
            check.name,
            check.chosen.len(),
            check.total
        ),
        format!("{}Source: {}", indent(1), check.album_file.display()),
    ];
    for (idx, record) in check.chosen.iter().enumerate() {
        lines.push(format!(
            "{}{} {}",
            indent(1),
            format_index(idx + 1),
            record.filename
        ));
        if !record.description.is_empty() {
            lines.push(format!(
                "{}{}",
                indent(2),
                truncate_desc(&record.description, 60)
            ));
        }
        if !record.tags.is_empty() {
            lines.push(format!("{}Tags: {}", indent(2), record.tags.join(", ")));
        }
    }
    for warning in &check.warnings {
        lines.push(format!("{}Warning: {}", indent(1), warning));
    }
    lines
}

pub fn print_album_checks(checks: &[AlbumCheck]) {
    for check in checks {
        for line in format_album_check(check) {
            println!("{}", line);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PageStats;
    use crate::resize::ResizeStats;
    use crate::types::ImageRecord;
    use std::path::PathBuf;

    fn summary(name: &str) -> AlbumSummary {
        AlbumSummary {
            name: name.to_string(),
            install_dir: PathBuf::from("site/summer"),
            total_images: 5,
            chosen_images: 3,
            variants: ResizeStats {
                generated: 4,
                cached: 1,
                failed: 1,
            },
            pages: PageStats {
                written: 4,
                skipped: 0,
            },
            originals_copied: 2,
            archive: Some(WriteStatus::Written),
        }
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn truncate_desc_short() {
        assert_eq!(truncate_desc("Short text", 40), "Short text");
    }

    #[test]
    fn truncate_desc_exact() {
        let text = "a".repeat(40);
        assert_eq!(truncate_desc(&text, 40), text);
    }

    #[test]
    fn truncate_desc_long() {
        let text = "a".repeat(50);
        assert_eq!(truncate_desc(&text, 40), format!("{}...", "a".repeat(40)));
    }

    #[test]
    fn truncate_desc_counts_characters() {
        assert_eq!(truncate_desc("ééééé", 3), "ééé...");
    }

    // =========================================================================
    // Resize progress tests
    // =========================================================================

    #[test]
    fn album_started_line() {
        let lines = format_resize_event(&ResizeEvent::AlbumStarted {
            name: "Summer".to_string(),
            image_count: 3,
        });
        assert_eq!(lines, vec!["Summer (3 photos)"]);
    }

    #[test]
    fn processed_image_shows_both_variants() {
        let lines = format_resize_event(&ResizeEvent::ImageProcessed {
            index: 0,
            filename: "beach.jpg".to_string(),
            thumbnail: VariantStatus::Generated,
            large: VariantStatus::Cached,
        });
        assert_eq!(
            lines,
            vec![
                "    001 beach.jpg",
                "        thumbnail: generated",
                "        large: cached",
            ]
        );
    }

    #[test]
    fn failed_image_shows_error() {
        let lines = format_resize_event(&ResizeEvent::ImageFailed {
            index: 4,
            filename: "bad.jpg".to_string(),
            error: "transform failed".to_string(),
        });
        assert_eq!(lines, vec!["    005 bad.jpg", "        failed: transform failed"]);
    }

    // =========================================================================
    // Summary tests
    // =========================================================================

    #[test]
    fn album_summary_lines() {
        let lines = format_album_summary(&summary("Summer"));
        assert_eq!(
            lines,
            vec![
                "Summer \u{2192} site/summer",
                "    Images: 3 of 5 chosen",
                "    Variants: 4 generated, 1 cached, 1 failed",
                "    Pages: 4 written, 0 skipped",
                "    Originals: 2 copied",
                "    Archive: written",
            ]
        );
    }

    #[test]
    fn album_summary_omits_absent_outputs() {
        let mut s = summary("Summer");
        s.originals_copied = 0;
        s.archive = None;
        let lines = format_album_summary(&s);
        assert_eq!(lines.len(), 4);
        assert!(!lines.iter().any(|l| l.contains("Archive")));
    }

    #[test]
    fn gallery_summary_numbers_albums_and_totals() {
        let gallery = GallerySummary {
            albums: vec![summary("Summer"), summary("Winter")],
            index: WriteStatus::Skipped,
        };
        let lines = format_gallery_summary(&gallery);

        assert_eq!(lines[0], "001 Summer \u{2192} site/summer");
        assert!(lines.contains(&"002 Winter \u{2192} site/summer".to_string()));
        assert_eq!(lines[lines.len() - 2], "Gallery index: skipped");
        assert_eq!(lines[lines.len() - 1], "Installed 2 albums, 6 photos, 2 failed");
    }

    // =========================================================================
    // Check tests
    // =========================================================================

    #[test]
    fn check_lists_chosen_records_and_warnings() {
        let check = AlbumCheck {
            name: "Summer".to_string(),
            album_file: PathBuf::from("album.txt"),
            total: 3,
            chosen: vec![
                ImageRecord::new("a.jpg").with_tags(["x"]),
                ImageRecord::new("b.jpg").with_description("A dog"),
            ],
            warnings: vec!["b.jpg: source not found in img".to_string()],
        };

        assert_eq!(
            format_album_check(&check),
            vec![
                "Summer (2 of 3 photos chosen)",
                "    Source: album.txt",
                "    001 a.jpg",
                "        Tags: x",
                "    002 b.jpg",
                "        A dog",
                "    Warning: b.jpg: source not found in img",
            ]
        );
    }
}
