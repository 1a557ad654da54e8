//! # flatgal
//!
//! Builds a static photo gallery from a flat-file description of images plus
//! a directory of source images. Every image gets a square thumbnail and a
//! display-size variant; chosen images are paginated into linked album pages
//! and per-image pages, and a gallery index ties several albums together.
//!
//! # Pipeline
//!
//! Each album runs the same sequence, strictly one phase after the other:
//!
//! ```text
//! 1. Parse      album file  →  Vec<ImageRecord>        (metadata)
//! 2. Filter     tags        →  chosen images            (filter)
//! 3. Resize     W workers   →  thumbnails + large       (resize, imaging)
//! 4. Paginate   page size   →  Vec<Page>                (paginate)
//! 5. Render     pages       →  index.html, page-N.html,
//!                              image-K.html             (render)
//! 6. Install    originals, optional zip archive         (album, archive)
//! ```
//!
//! Only the resize phase is parallel. Rendering needs every record's derived
//! filenames, so all resize work for an album finishes before any page of that
//! album is written. The gallery orchestrator runs albums one after another and
//! writes the top-level index last.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`metadata`] | Album file parser and writer (filename / description / `Tag:` blocks) |
//! | [`filter`] | Tag selection of the chosen subset |
//! | [`naming`] | Derived-variant, page, image-page and archive filenames |
//! | [`imaging`] | Image transform boundary: [`imaging::ImageBackend`] trait, pure-Rust backend, dimension math |
//! | [`resize`] | Bounded worker pool materializing both variants per record |
//! | [`paginate`] | Fixed-size pages with prev/next linkage |
//! | [`render`] | Maud templates for gallery index, album pages and image pages |
//! | [`archive`] | Which originals go into the album zip, and writing it |
//! | [`album`] | Per-album orchestration |
//! | [`gallery_file`] | Gallery description file (`key = value` blocks) |
//! | [`gallery`] | Multi-album orchestration and the top-level index |
//! | [`merge`] | Merging two album files ordered by filename |
//! | [`config`] | Layered TOML build configuration |
//! | [`output`] | CLI output formatting |
//! | [`types`] | Shared record types |
//!
//! # Caching
//!
//! Every output (derived raster, HTML page, copied original, archive) is
//! skipped when the target file already exists, unless the matching force flag
//! is set. The key is the output filename alone: a source image replaced under
//! the same name is not picked up until images are forced. Re-running after an
//! interrupted build therefore resumes cheaply.

pub mod album;
pub mod archive;
pub mod config;
pub mod filter;
pub mod gallery;
pub mod gallery_file;
pub mod imaging;
pub mod merge;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod paginate;
pub mod render;
pub mod resize;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
