//! HTML page rendering.
//!
//! Three page kinds, each a pure function from data to [`Markup`]:
//!
//! - **Gallery index** (`index.html` at the gallery root): one card per album
//!   with its representative thumbnail.
//! - **Album pages** (`index.html`, `page-N.html`): thumbnail grid for one
//!   [`Page`], pager controls, optional archive download link.
//! - **Image pages** (`image-K.html`): the large variant, optionally linked to
//!   the original, the description, and prev/next links across the whole
//!   chosen sequence (not just the current album page).
//!
//! ## Output Structure
//!
//! ```text
//! install/
//! ├── index.html        # album page 1
//! ├── page-2.html       # album page 2
//! ├── image-0.html      # one per chosen image, 0-based
//! ├── image-1.html
//! └── ...
//! ```
//!
//! All links are relative to the album's install directory, so an album can
//! be moved or served from any prefix. Filenames are percent-encoded before
//! they go into an `href` or `src`.
//!
//! ## Degraded output
//!
//! An image whose resize failed has no derived variants. Its grid cell and
//! image page show a placeholder naming the file instead of a broken `<img>`.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping. The
//! stylesheet is embedded from `static/style.css` at compile time.

use crate::naming::{album_page_filename, image_page_filename, url_component};
use crate::paginate::{Page, page_of, paginate};
use crate::types::AlbumImage;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

const CSS: &str = include_str!("../static/style.css");

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error writing {}: {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What one image contributes to rendered pages. URLs are relative to the
/// album directory and already percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlImage {
    /// Flat 0-based index within the chosen images.
    pub index: usize,
    pub filename: String,
    pub description: String,
    pub thumb_url: Option<String>,
    pub large_url: Option<String>,
    pub original_url: Option<String>,
    pub page_url: String,
}

impl HtmlImage {
    pub fn from_album_images(images: &[AlbumImage], include_originals: bool) -> Vec<Self> {
        images
            .iter()
            .enumerate()
            .map(|(index, image)| Self {
                index,
                filename: image.filename().to_string(),
                description: image.record.description.clone(),
                thumb_url: image
                    .derived
                    .as_ref()
                    .map(|d| url_component(&d.thumbnail_filename)),
                large_url: image.derived.as_ref().map(|d| url_component(&d.large_filename)),
                original_url: include_originals.then(|| url_component(image.filename())),
                page_url: image_page_filename(index),
            })
            .collect()
    }
}

/// Breadcrumb target for an album installed inside a gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryLink {
    pub name: String,
    /// Gallery index relative to the album directory, e.g. `../../index.html`.
    pub url: String,
}

/// Album-wide data shared by every page of one album.
#[derive(Debug, Clone)]
pub struct AlbumView<'a> {
    pub name: &'a str,
    pub gallery: Option<&'a GalleryLink>,
    pub archive_url: Option<String>,
    pub page_size: usize,
}

/// One album card on the gallery index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryEntry {
    pub name: String,
    /// `None` for an album with no chosen images.
    pub thumb_url: Option<String>,
    /// `None` when the album wrote no pages.
    pub index_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Skipped,
}

/// Pages written and skipped for one album or gallery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageStats {
    pub written: usize,
    pub skipped: usize,
}

impl PageStats {
    fn record(&mut self, status: WriteStatus) {
        match status {
            WriteStatus::Written => self.written += 1,
            WriteStatus::Skipped => self.skipped += 1,
        }
    }
}

impl std::fmt::Display for PageStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} written, {} skipped", self.written, self.skipped)
    }
}

/// Write `markup` to `path` unless the file exists and `force` is off.
pub fn write_page(path: &Path, markup: Markup, force: bool) -> Result<WriteStatus, RenderError> {
    let io_err = |source: std::io::Error| RenderError::Io {
        path: path.to_path_buf(),
        source,
    };
    if !force && path.try_exists().map_err(io_err)? {
        tracing::debug!(path = %path.display(), "page exists, skipping");
        return Ok(WriteStatus::Skipped);
    }
    fs::write(path, markup.into_string()).map_err(io_err)?;
    tracing::debug!(path = %path.display(), "wrote page");
    Ok(WriteStatus::Written)
}

/// Render and write every album page and image page into `install_dir`.
pub fn write_album_pages(
    install_dir: &Path,
    album: &AlbumView<'_>,
    images: &[HtmlImage],
    force: bool,
) -> Result<PageStats, RenderError> {
    let mut stats = PageStats::default();

    for page in paginate(images, album.page_size) {
        let markup = render_album_page(album, &page);
        stats.record(write_page(&install_dir.join(&page.filename), markup, force)?);
    }

    for image in images {
        let markup = render_image_page(album, images, image.index);
        stats.record(write_page(&install_dir.join(&image.page_url), markup, force)?);
    }

    Ok(stats)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, body_class: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body class=(body_class) {
                (content)
            }
        }
    }
}

fn site_header(heading: &str, breadcrumb: Markup) -> Markup {
    html! {
        header.site-header {
            h1 { (heading) }
            nav.breadcrumb {
                (breadcrumb)
            }
        }
    }
}

fn album_breadcrumb(album: &AlbumView<'_>) -> Markup {
    html! {
        @if let Some(gallery) = album.gallery {
            a href=(gallery.url) { (gallery.name) }
            " › "
        }
        a href="index.html" { (album.name) }
    }
}

/// Link when present, an invisible placeholder otherwise so the layout stays put.
fn nav_link(url: Option<&str>, label: &str, rel: &str) -> Markup {
    html! {
        @match url {
            Some(url) => {
                a href=(url) rel=(rel) { (label) }
            }
            None => {
                span.disabled { (label) }
            }
        }
    }
}

fn thumbnail_cell(image: &HtmlImage) -> Markup {
    html! {
        li {
            a href=(image.page_url) {
                @match &image.thumb_url {
                    Some(src) => {
                        img src=(src) alt=(image.filename) loading="lazy";
                    }
                    None => {
                        span.missing { (image.filename) }
                    }
                }
            }
        }
    }
}

/// Album page: thumbnail grid plus pager.
pub fn render_album_page(album: &AlbumView<'_>, page: &Page<'_, HtmlImage>) -> Markup {
    let title = if page.total_pages > 1 {
        format!("{} ({}/{})", album.name, page.number, page.total_pages)
    } else {
        album.name.to_string()
    };

    let content = html! {
        (site_header(album.name, album_breadcrumb(album)))
        main.album-page {
            ul.thumb-grid {
                @for image in page.images {
                    (thumbnail_cell(image))
                }
            }
            @if page.total_pages > 1 {
                nav.pager {
                    (nav_link(page.previous_url.as_deref(), "‹ Previous", "prev"))
                    span.page-count { "Page " (page.number) " of " (page.total_pages) }
                    (nav_link(page.next_url.as_deref(), "Next ›", "next"))
                }
            }
            @if let Some(archive) = &album.archive_url {
                p.archive-link {
                    a href=(archive) download { "Download all as archive" }
                }
            }
        }
    };

    base_document(&title, "album-view", content)
}

/// Image page for `images[index]`, linked to its neighbours in the flat sequence.
pub fn render_image_page(album: &AlbumView<'_>, images: &[HtmlImage], index: usize) -> Markup {
    let image = &images[index];
    let prev_url = index.checked_sub(1).map(image_page_filename);
    let next_url = (index + 1 < images.len()).then(|| image_page_filename(index + 1));
    let back_url = album_page_filename(page_of(index, album.page_size));
    let title = format!("{} - {}", album.name, image.filename);

    let picture = html! {
        @match &image.large_url {
            Some(src) => {
                img src=(src) alt=(image.filename);
            }
            None => {
                span.missing { "image unavailable: " (image.filename) }
            }
        }
    };

    let content = html! {
        (site_header(album.name, album_breadcrumb(album)))
        main.image-page {
            figure.image-frame {
                @match &image.original_url {
                    Some(original) => {
                        a href=(original) { (picture) }
                    }
                    None => {
                        (picture)
                    }
                }
            }
            @if !image.description.is_empty() {
                p.description { (image.description) }
            }
            nav.image-nav {
                (nav_link(prev_url.as_deref(), "‹ Previous", "prev"))
                a.back href=(back_url) { "Index" }
                (nav_link(next_url.as_deref(), "Next ›", "next"))
            }
        }
    };

    base_document(&title, "image-view", content)
}

fn album_card(entry: &GalleryEntry) -> Markup {
    let thumb = html! {
        @match &entry.thumb_url {
            Some(src) => {
                img src=(src) alt=(entry.name) loading="lazy";
            }
            None => {
                span.missing { "no images" }
            }
        }
    };
    html! {
        figure.album-card {
            @match &entry.index_url {
                Some(url) => {
                    a href=(url) { (thumb) }
                }
                None => {
                    (thumb)
                }
            }
            figcaption { (entry.name) }
        }
    }
}

/// Top-level gallery index.
pub fn render_gallery_index(title: &str, entries: &[GalleryEntry]) -> Markup {
    let content = html! {
        (site_header(title, html! {}))
        main.gallery-page {
            ul.thumb-grid {
                @for entry in entries {
                    li { (album_card(entry)) }
                }
            }
        }
    };

    base_document(title, "gallery-view", content)
}

// ============================================================================
// Tests
// ============================================================================
